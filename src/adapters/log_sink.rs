//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing every application event to the
//! logger (UART / USB-CDC on the device, stderr in the simulator), ending
//! with a one-word summary of where the washer now stands.

use log::info;

use crate::app::events::{AppEvent, RunState};
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the console.
#[derive(Debug, Default)]
pub struct LogEventSink {
    emitted: u32,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events logged so far.
    pub fn emitted(&self) -> u32 {
        self.emitted
    }

    fn line(event: &AppEvent) -> String {
        match event {
            AppEvent::Started(state) => {
                format!("START | The washer is {}", RunState::from(state))
            }
            AppEvent::Transition { transition, state } => {
                format!("STATE | {:?} | The washer is {}", transition, RunState::from(state))
            }
        }
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        self.emitted = self.emitted.wrapping_add(1);
        info!("{}", Self::line(event));
    }
}
