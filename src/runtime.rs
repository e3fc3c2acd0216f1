//! Foreground poll loop.
//!
//! ```text
//!  ┌─────────────── one cycle ────────────────┐
//!  │ buttons ──▶ press()            ┐         │
//!  │ UDP     ──▶ poll_once()        ├─ lock ─▶ WasherService
//!  │ take_changed() + snapshot      ┘         │
//!  │ StateReporter::after_cycle()  (no lock)  │
//!  └──────────────────────────────────────────┘
//!           tick timer ──▶ tick() ─── lock ──▶ WasherService
//! ```
//!
//! Every cycle consumes the dirty flag whether or not a report is sent, so
//! a burst of transitions inside one cycle yields one report carrying the
//! latest state.  The HTTP request runs outside the service lock so a
//! slow endpoint never stalls the animation.

use std::net::UdpSocket;

use log::info;

use crate::app::ports::{DisplayPort, EventSink, InputPort, ReportPort, TickTimerPort};
use crate::app::service::WasherService;
use crate::app::shared::SharedWasher;
use crate::net::channel::{CommandChannel, DatagramTransport, PollOutcome};
use crate::net::report::{ReportOutcome, StateReporter};

/// What one [`Runtime::cycle`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub presses: u32,
    pub poll: PollOutcome,
    pub changed: bool,
    pub report: ReportOutcome,
}

pub struct Runtime<D, T, E, I, R, S = UdpSocket> {
    washer: SharedWasher<WasherService<D, T, E>>,
    channel: CommandChannel<S>,
    reporter: StateReporter<R>,
    input: I,
    cycles: u64,
}

impl<D, T, E, I, R, S> Runtime<D, T, E, I, R, S>
where
    D: DisplayPort,
    T: TickTimerPort,
    E: EventSink,
    I: InputPort,
    R: ReportPort,
    S: DatagramTransport,
{
    pub fn new(
        washer: SharedWasher<WasherService<D, T, E>>,
        channel: CommandChannel<S>,
        reporter: StateReporter<R>,
        input: I,
    ) -> Self {
        Self {
            washer,
            channel,
            reporter,
            input,
            cycles: 0,
        }
    }

    pub fn cycle(&mut self) -> CycleReport {
        self.cycles = self.cycles.wrapping_add(1);

        let mut presses = 0;
        while let Some(button) = self.input.poll_press() {
            self.washer.with(|svc| svc.press(button));
            presses += 1;
        }

        let poll = self.channel.poll_once(&mut self.washer);

        let (changed, snapshot) = self.washer.with(|svc| (svc.take_changed(), svc.report()));
        let report = self.reporter.after_cycle(changed, &snapshot);

        CycleReport {
            presses,
            poll,
            changed,
            report,
        }
    }

    /// Run forever.
    pub fn run(&mut self) -> ! {
        info!(
            "runtime: entering poll loop (reporting {})",
            if self.reporter.is_enabled() { "enabled" } else { "disabled" }
        );
        loop {
            self.cycle();
        }
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn washer(&self) -> &SharedWasher<WasherService<D, T, E>> {
        &self.washer
    }

    pub fn channel(&self) -> &CommandChannel<S> {
        &self.channel
    }

    pub fn reporter(&self) -> &StateReporter<R> {
        &self.reporter
    }
}
