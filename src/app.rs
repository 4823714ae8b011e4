use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tracing::debug;

use crate::{
    input::{intent_for_key, Control, Focus, Intent},
    runtime::{Scheduler, TimerEvent},
    timer::TimerWidget,
    ui,
};

/// Shell options resolved from the CLI and config file
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    pub key_hints: bool,
    pub mouse: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            key_hints: true,
            mouse: true,
        }
    }
}

pub struct App<S: Scheduler> {
    widget: TimerWidget<S>,
    focus: Focus,
    settings: Settings,
    should_quit: bool,
}

impl<S: Scheduler> App<S> {
    pub fn new(widget: TimerWidget<S>, settings: Settings) -> Self {
        Self {
            widget,
            focus: Focus::default(),
            settings,
            should_quit: false,
        }
    }

    pub fn widget(&self) -> &TimerWidget<S> {
        &self.widget
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Applies one event. `area` is the frame the app was last drawn into,
    /// needed to hit-test mouse clicks. Returns true if a redraw is needed.
    pub fn handle_event(&mut self, event: TimerEvent, area: Rect) -> bool {
        match event {
            TimerEvent::Tick(id) => {
                let changed = self.widget.on_tick(id);
                self.focus.settle(self.widget.state());
                changed
            }
            TimerEvent::Resize => true,
            TimerEvent::Key(key) => self.on_key(key),
            TimerEvent::Mouse(mouse) => self.on_mouse(mouse, area),
        }
    }

    /// Presses a control. Disabled controls reject the press.
    pub fn activate(&mut self, control: Control) -> bool {
        if !control.is_enabled(self.widget.state()) {
            debug!(?control, "disabled control pressed");
            return false;
        }
        let applied = self.widget.dispatch(control.action());
        self.focus.settle(self.widget.state());
        applied
    }

    pub fn teardown(&mut self) {
        self.widget.teardown();
    }

    fn on_key(&mut self, key: KeyEvent) -> bool {
        match intent_for_key(key) {
            Intent::Quit => {
                self.should_quit = true;
                false
            }
            Intent::FocusNext => {
                self.focus.next(self.widget.state());
                true
            }
            Intent::FocusPrev => {
                self.focus.prev(self.widget.state());
                true
            }
            Intent::Activate => {
                self.activate(self.focus.current());
                true
            }
            Intent::Ignore => false,
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent, area: Rect) -> bool {
        if !self.settings.mouse {
            return false;
        }
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return false;
        }

        let regions = ui::layout(area, self.settings.key_hints);
        match regions.control_at(mouse.column, mouse.row) {
            Some(control) if control.is_enabled(self.widget.state()) => {
                self.focus.set(control);
                self.activate(control);
                true
            }
            _ => false,
        }
    }
}
