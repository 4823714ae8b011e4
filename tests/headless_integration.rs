use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;

use digital_timer::{
    app::{App, Settings},
    input::Control,
    runtime::{ManualScheduler, Runner, TestEventSource, ThreadScheduler, TimerEvent},
    timer::{Status, TimerState, TimerWidget},
};

const AREA: Rect = Rect {
    x: 0,
    y: 0,
    width: 80,
    height: 24,
};

fn key(code: KeyCode) -> TimerEvent {
    TimerEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

// Headless run of the one-minute scenario through Runner/TestEventSource,
// with ticks delivered deterministically by the test.
#[test]
fn headless_one_minute_countdown_completes() {
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(TestEventSource::new(rx), Duration::from_millis(5));
    let scheduler = ManualScheduler::new();
    let mut app = App::new(TimerWidget::new(scheduler.clone()), Settings::default());

    // focus "-" and press it until the limit bottoms out at 1
    tx.send(key(KeyCode::Tab)).unwrap();
    tx.send(key(KeyCode::Tab)).unwrap();
    for _ in 0..30 {
        tx.send(key(KeyCode::Enter)).unwrap();
    }
    // back to Start and press it
    tx.send(key(KeyCode::Tab)).unwrap();
    tx.send(key(KeyCode::Tab)).unwrap();
    tx.send(key(KeyCode::Enter)).unwrap();

    while let Some(ev) = runner.step() {
        app.handle_event(ev, AREA);
    }
    assert_eq!(app.widget().state().limit_minutes, 1);
    assert!(app.widget().state().is_running);

    let id = scheduler.active().expect("one interval while running");
    for _ in 0..61 {
        tx.send(TimerEvent::Tick(id)).unwrap();
    }
    while let Some(ev) = runner.step() {
        app.handle_event(ev, AREA);
    }

    let state = app.widget().state();
    assert_eq!(state.format_remaining(), "00:00");
    assert_eq!(state.status(), Status::Paused);
    assert!(!state.is_running);
    assert!(scheduler.live().is_empty());
}

#[test]
fn headless_stale_ticks_after_pause_are_ignored() {
    let scheduler = ManualScheduler::new();
    let mut app = App::new(TimerWidget::new(scheduler.clone()), Settings::default());

    app.activate(Control::StartPause);
    let id = scheduler.active().unwrap();
    app.handle_event(TimerEvent::Tick(id), AREA);
    app.activate(Control::StartPause);

    // ticks queued before the pause landed
    for _ in 0..5 {
        assert!(!app.handle_event(TimerEvent::Tick(id), AREA));
    }
    assert_eq!(app.widget().state().elapsed_seconds, 1);
}

#[test]
fn headless_reset_restores_defaults_from_any_state() {
    let scheduler = ManualScheduler::new();
    let mut app = App::new(TimerWidget::new(scheduler.clone()), Settings::default());

    app.activate(Control::Increment);
    app.activate(Control::Increment);
    app.activate(Control::StartPause);
    let id = scheduler.active().unwrap();
    for _ in 0..10 {
        app.handle_event(TimerEvent::Tick(id), AREA);
    }
    assert_eq!(app.widget().state().format_remaining(), "26:50");

    app.activate(Control::Reset);
    assert_eq!(
        *app.widget().state(),
        TimerState {
            is_running: false,
            limit_minutes: 25,
            elapsed_seconds: 0
        }
    );
    assert!(scheduler.live().is_empty());
}

// Real clock: one-second ticks from the thread scheduler reach the widget.
#[test]
fn thread_scheduler_drives_timer_in_real_time() {
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(TestEventSource::new(rx), Duration::from_millis(50));
    let mut app = App::new(
        TimerWidget::new(ThreadScheduler::new(tx)),
        Settings::default(),
    );

    app.activate(Control::StartPause);
    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    while app.widget().state().elapsed_seconds < 2 && std::time::Instant::now() < deadline {
        if let Some(ev) = runner.step() {
            app.handle_event(ev, AREA);
        }
    }
    assert_eq!(app.widget().state().elapsed_seconds, 2);

    app.activate(Control::StartPause);
    let paused_at = app.widget().state().elapsed_seconds;
    let quiet_until = std::time::Instant::now() + Duration::from_millis(1500);
    while std::time::Instant::now() < quiet_until {
        if let Some(ev) = runner.step() {
            app.handle_event(ev, AREA);
        }
    }
    assert_eq!(app.widget().state().elapsed_seconds, paused_at);
    assert!(!app.widget().state().is_running);
}
