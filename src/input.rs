use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::timer::{Action, TimerState};

/// The four on-screen controls, in focus order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Control {
    StartPause,
    Reset,
    Decrement,
    Increment,
}

impl Control {
    pub const ALL: [Control; 4] = [
        Control::StartPause,
        Control::Reset,
        Control::Decrement,
        Control::Increment,
    ];

    pub fn action(self) -> Action {
        match self {
            Control::StartPause => Action::ToggleRun,
            Control::Reset => Action::Reset,
            Control::Decrement => Action::DecrementLimit,
            Control::Increment => Action::IncrementLimit,
        }
    }

    pub fn is_enabled(self, state: &TimerState) -> bool {
        match self {
            Control::StartPause | Control::Reset => true,
            Control::Decrement | Control::Increment => state.limit_controls_enabled(),
        }
    }

    fn index(self) -> usize {
        match self {
            Control::StartPause => 0,
            Control::Reset => 1,
            Control::Decrement => 2,
            Control::Increment => 3,
        }
    }
}

/// Which control Enter/Space will press
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Focus {
    current: Control,
}

impl Default for Focus {
    fn default() -> Self {
        Self {
            current: Control::StartPause,
        }
    }
}

impl Focus {
    pub fn current(&self) -> Control {
        self.current
    }

    pub fn set(&mut self, control: Control) {
        self.current = control;
    }

    pub fn next(&mut self, state: &TimerState) {
        self.step(state, 1);
    }

    pub fn prev(&mut self, state: &TimerState) {
        self.step(state, Control::ALL.len() - 1);
    }

    /// Moves focus off a control that has become disabled
    pub fn settle(&mut self, state: &TimerState) {
        if !self.current.is_enabled(state) {
            self.current = Control::StartPause;
        }
    }

    // skips disabled controls; StartPause is always enabled so this terminates
    fn step(&mut self, state: &TimerState, by: usize) {
        let len = Control::ALL.len();
        let mut idx = self.current.index();
        loop {
            idx = (idx + by) % len;
            let candidate = Control::ALL[idx];
            if candidate.is_enabled(state) {
                self.current = candidate;
                return;
            }
        }
    }
}

/// What a key press means to the app
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    Activate,
    FocusNext,
    FocusPrev,
    Quit,
    Ignore,
}

pub fn intent_for_key(key: KeyEvent) -> Intent {
    if key.kind != KeyEventKind::Press {
        return Intent::Ignore;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Intent::Quit,
        KeyCode::Esc | KeyCode::Char('q') => Intent::Quit,
        KeyCode::Enter | KeyCode::Char(' ') => Intent::Activate,
        KeyCode::Tab | KeyCode::Right | KeyCode::Down => Intent::FocusNext,
        KeyCode::BackTab | KeyCode::Left | KeyCode::Up => Intent::FocusPrev,
        _ => Intent::Ignore,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn progressed() -> TimerState {
        TimerState {
            is_running: true,
            limit_minutes: 25,
            elapsed_seconds: 3,
        }
    }

    #[test]
    fn test_focus_cycles_through_all_controls_at_start() {
        let state = TimerState::default();
        let mut focus = Focus::default();
        let mut seen = vec![focus.current()];
        for _ in 0..4 {
            focus.next(&state);
            seen.push(focus.current());
        }
        assert_eq!(
            seen,
            vec![
                Control::StartPause,
                Control::Reset,
                Control::Decrement,
                Control::Increment,
                Control::StartPause
            ]
        );

        focus.prev(&state);
        assert_eq!(focus.current(), Control::Increment);
    }

    #[test]
    fn test_focus_skips_disabled_limit_controls() {
        let state = progressed();
        let mut focus = Focus::default();
        focus.next(&state);
        assert_eq!(focus.current(), Control::Reset);
        focus.next(&state);
        assert_eq!(focus.current(), Control::StartPause);
        focus.prev(&state);
        assert_eq!(focus.current(), Control::Reset);
    }

    #[test]
    fn test_settle_moves_off_disabled_control() {
        let mut focus = Focus::default();
        focus.set(Control::Increment);
        focus.settle(&TimerState::default());
        assert_eq!(focus.current(), Control::Increment);

        focus.settle(&progressed());
        assert_eq!(focus.current(), Control::StartPause);
    }

    #[test]
    fn test_control_actions() {
        assert_eq!(Control::StartPause.action(), Action::ToggleRun);
        assert_eq!(Control::Reset.action(), Action::Reset);
        assert_eq!(Control::Decrement.action(), Action::DecrementLimit);
        assert_eq!(Control::Increment.action(), Action::IncrementLimit);
    }

    #[test]
    fn test_key_intents() {
        assert_matches!(intent_for_key(key(KeyCode::Enter)), Intent::Activate);
        assert_matches!(intent_for_key(key(KeyCode::Char(' '))), Intent::Activate);
        assert_matches!(intent_for_key(key(KeyCode::Tab)), Intent::FocusNext);
        assert_matches!(intent_for_key(key(KeyCode::Right)), Intent::FocusNext);
        assert_matches!(intent_for_key(key(KeyCode::BackTab)), Intent::FocusPrev);
        assert_matches!(intent_for_key(key(KeyCode::Left)), Intent::FocusPrev);
        assert_matches!(intent_for_key(key(KeyCode::Esc)), Intent::Quit);
        assert_matches!(intent_for_key(key(KeyCode::Char('q'))), Intent::Quit);
        assert_matches!(
            intent_for_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Intent::Quit
        );
        assert_matches!(intent_for_key(key(KeyCode::Char('c'))), Intent::Ignore);
        assert_matches!(intent_for_key(key(KeyCode::Char('s'))), Intent::Ignore);
    }

    #[test]
    fn test_key_release_is_ignored() {
        let release = KeyEvent {
            code: KeyCode::Enter,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(intent_for_key(release), Intent::Ignore);
    }
}
