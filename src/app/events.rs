//! Outbound application events.
//!
//! The [`WasherService`](super::service::WasherService) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (serial log, test recorder, ...).

use core::fmt;

use super::ports::StateReport;
use super::state::Transition;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The service drew the boot screen (carries initial state).
    Started(StateReport),

    /// A state transition happened.
    Transition {
        transition: Transition,
        state: StateReport,
    },
}

/// Coarse run state for human-readable summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Off,
    Stopped,
    Running,
    Paused,
}

impl From<&StateReport> for RunState {
    fn from(s: &StateReport) -> Self {
        match (s.on, s.is_running, s.is_paused) {
            (false, _, _) => Self::Off,
            (true, _, true) => Self::Paused,
            (true, true, false) => Self::Running,
            (true, false, false) => Self::Stopped,
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "OFF"),
            Self::Stopped => write!(f, "STOPPED"),
            Self::Running => write!(f, "RUNNING"),
            Self::Paused => write!(f, "PAUSED"),
        }
    }
}
