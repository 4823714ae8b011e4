use crate::timer::{Status, TimerState};

pub const HEADING: &str = "Digital Timer";
pub const LIMIT_LABEL: &str = "Set Timer limit";

const ICON_BASE_URL: &str = "https://assets.ccbp.in/frontend/react-js";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Icon {
    Play,
    Pause,
    Reset,
}

impl Icon {
    pub fn url(&self) -> String {
        let name = match self {
            Icon::Play => "play-icon-img.png",
            Icon::Pause => "pause-icon-img.png",
            Icon::Reset => "reset-icon-img.png",
        };
        format!("{}/{}", ICON_BASE_URL, name)
    }

    pub fn alt(&self) -> &'static str {
        match self {
            Icon::Play => "play icon",
            Icon::Pause => "pause icon",
            Icon::Reset => "reset icon",
        }
    }

    /// Terminal stand-in for the image
    pub fn glyph(&self) -> &'static str {
        match self {
            Icon::Play => "▶",
            Icon::Pause => "⏸",
            Icon::Reset => "↺",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlView {
    pub icon: Icon,
    pub label: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LimitView {
    pub label: &'static str,
    pub value: u32,
    pub decrement: &'static str,
    pub increment: &'static str,
    pub enabled: bool,
}

/// Everything the renderer needs, derived from the timer state alone
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimerView {
    pub heading: &'static str,
    pub time: String,
    pub status: Status,
    pub start_pause: ControlView,
    pub reset: ControlView,
    pub limit: LimitView,
}

impl From<&TimerState> for TimerView {
    fn from(state: &TimerState) -> Self {
        let start_pause = if state.is_running {
            ControlView {
                icon: Icon::Pause,
                label: "Pause",
            }
        } else {
            ControlView {
                icon: Icon::Play,
                label: "Start",
            }
        };

        Self {
            heading: HEADING,
            time: state.format_remaining(),
            status: state.status(),
            start_pause,
            reset: ControlView {
                icon: Icon::Reset,
                label: "Reset",
            },
            limit: LimitView {
                label: LIMIT_LABEL,
                value: state.limit_minutes,
                decrement: "-",
                increment: "+",
                enabled: state.limit_controls_enabled(),
            },
        }
    }
}
