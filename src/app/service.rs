//! Washer service, the hexagonal core.
//!
//! [`WasherService`] owns the [`ApplianceState`] and translates every
//! successful transition into display redraws and tick-timer arming.  All
//! I/O flows through port traits, so the whole service is testable with
//! mock adapters.
//!
//! ```text
//!  CommandChannel ──▶ ┌────────────────────────┐ ──▶ DisplayPort
//!     InputPort  ──▶  │     WasherService      │ ──▶ TickTimerPort
//!  tick timer    ──▶  │ ApplianceState · Anim  │ ──▶ EventSink
//!                     └────────────────────────┘
//! ```

use log::{debug, info};

use super::animation::{self, Frame};
use super::commands::{ButtonEvent, WasherCommand};
use super::events::AppEvent;
use super::ports::{CommandHandler, DisplayPort, EventSink, StateReport, TickTimerPort};
use super::screen;
use super::state::{ApplianceState, Transition};

// ───────────────────────────────────────────────────────────────
// WasherService
// ───────────────────────────────────────────────────────────────

/// The washer service orchestrates all domain logic.
pub struct WasherService<D, T, E> {
    state: ApplianceState,
    display: D,
    timer: T,
    sink: E,
    tick_count: u64,
}

impl<D: DisplayPort, T: TickTimerPort, E: EventSink> WasherService<D, T, E> {
    /// Construct the service.  Does **not** draw anything; call
    /// [`boot`](Self::boot) next.
    pub fn new(display: D, timer: T, sink: E) -> Self {
        Self {
            state: ApplianceState::new(),
            display,
            timer,
            sink,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Draw the powered-off face and announce the initial state.
    pub fn boot(&mut self) {
        screen::draw_boot(&mut self.display);
        let state = self.report();
        self.sink.emit(&AppEvent::Started(state));
        info!("WasherService booted (powered off)");
    }

    // ── Transitions ───────────────────────────────────────────

    pub fn turn_on(&mut self) -> Option<Transition> {
        let t = self.state.turn_on();
        self.apply(t)
    }

    pub fn turn_off(&mut self) -> Option<Transition> {
        let t = self.state.turn_off();
        self.apply(t)
    }

    pub fn start(&mut self) -> Option<Transition> {
        let t = self.state.start();
        self.apply(t)
    }

    pub fn stop(&mut self) -> Option<Transition> {
        let t = self.state.stop();
        self.apply(t)
    }

    pub fn pause(&mut self) -> Option<Transition> {
        let t = self.state.pause();
        self.apply(t)
    }

    pub fn resume(&mut self) -> Option<Transition> {
        let t = self.state.resume();
        self.apply(t)
    }

    /// Dispatch a network command.
    pub fn execute(&mut self, cmd: WasherCommand) -> Option<Transition> {
        match cmd {
            WasherCommand::Off => self.turn_off(),
            WasherCommand::On => self.turn_on(),
            WasherCommand::Stop => self.stop(),
            WasherCommand::Start => self.start(),
            WasherCommand::Resume => self.resume(),
            WasherCommand::Pause => self.pause(),
        }
    }

    /// Resolve a toggle button against the current state.
    pub fn press(&mut self, button: ButtonEvent) -> Option<Transition> {
        info!("Button: {:?}", button);
        match button {
            ButtonEvent::PowerToggle if self.state.powered() => self.turn_off(),
            ButtonEvent::PowerToggle => self.turn_on(),
            ButtonEvent::StartStopToggle if self.state.running() => self.stop(),
            ButtonEvent::StartStopToggle => self.start(),
            ButtonEvent::PauseResumeToggle if self.state.paused() => self.resume(),
            ButtonEvent::PauseResumeToggle => self.pause(),
        }
    }

    // ── Per-tick animation ────────────────────────────────────

    /// Render one animation frame.  Called from the tick timer context.
    pub fn tick(&mut self) -> Frame {
        self.tick_count += 1;
        let frame = animation::tick(&mut self.state);
        screen::draw_frame(&mut self.display, &frame);
        frame
    }

    // ── Queries ───────────────────────────────────────────────

    /// Read-and-clear the dirty flag.
    pub fn take_changed(&mut self) -> bool {
        self.state.take_changed()
    }

    /// Snapshot of the reported flags.
    pub fn report(&self) -> StateReport {
        StateReport {
            on: self.state.powered(),
            is_running: self.state.running(),
            is_paused: self.state.paused(),
        }
    }

    pub fn state(&self) -> &ApplianceState {
        &self.state
    }

    /// Ticks rendered since boot, including idle frames.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn sink(&self) -> &E {
        &self.sink
    }

    // ── Internal ──────────────────────────────────────────────

    /// Mirror a transition on the display and the tick timer.
    fn apply(&mut self, transition: Option<Transition>) -> Option<Transition> {
        let Some(t) = transition else {
            debug!("transition ignored in current state");
            return None;
        };

        match t {
            Transition::PoweredOn => screen::draw_power(&mut self.display, true),
            Transition::PoweredOff { stopped } => {
                if stopped {
                    self.timer.disarm();
                    screen::draw_stopped(&mut self.display);
                }
                screen::draw_power(&mut self.display, false);
            }
            Transition::Started => self.timer.arm(),
            Transition::Stopped => {
                self.timer.disarm();
                screen::draw_stopped(&mut self.display);
            }
            Transition::Paused | Transition::Resumed => {}
        }

        let state = self.report();
        self.sink.emit(&AppEvent::Transition { transition: t, state });
        Some(t)
    }
}

impl<D: DisplayPort, T: TickTimerPort, E: EventSink> CommandHandler for WasherService<D, T, E> {
    fn handle_command(&mut self, cmd: WasherCommand) {
        info!("{} command received", cmd.name());
        self.execute(cmd);
    }
}
