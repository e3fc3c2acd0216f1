//! Appliance state machine.
//!
//! ```text
//!            turn_on               start
//!   ┌─────┐ ───────▶ ┌─────────┐ ───────▶ ┌─────────┐  pause   ┌────────┐
//!   │ Off │          │ Stopped │          │ Running │ ───────▶ │ Paused │
//!   └─────┘ ◀─────── └─────────┘ ◀─────── └─────────┘ ◀─────── └────────┘
//!           turn_off              stop               resume / start
//! ```
//!
//! Every operation is a silent no-op when its precondition fails.  A
//! successful transition sets the sticky `changed` flag and returns the
//! [`Transition`] that happened, so the service can mirror it on the display
//! and the tick timer.  `turn_off` from Running/Paused performs the stop
//! inline and reports it as a single transition.

/// Cursors wrap here.  `0x1000` keeps the `0x20`/`0x100`/`0x800` bit tests
/// identical to unbounded counting, and the extra factor of 45 makes the
/// modulus a whole number of 360° turns so the sweep never jumps.
pub const PHASE_WRAP: u32 = 0x1000 * 45;

/// Blink cursor only feeds bit tests, so one blink period is enough.
pub const BLINK_WRAP: u32 = 0x1000;

/// Amount both cursors advance per animation tick.
pub const CURSOR_STEP: u32 = 0x20;

/// An externally observable state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    PoweredOn,
    /// `stopped` is set when the washer was running and had to stop first.
    PoweredOff { stopped: bool },
    Started,
    Stopped,
    Paused,
    Resumed,
}

/// Power / run / pause flags plus the animation cursors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplianceState {
    powered: bool,
    running: bool,
    paused: bool,
    changed: bool,
    phase: u32,
    blink_phase: u32,
}

impl Default for ApplianceState {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplianceState {
    /// Powered off, with `changed` set so the first poll reports the
    /// initial state.
    pub fn new() -> Self {
        Self {
            powered: false,
            running: false,
            paused: false,
            changed: true,
            phase: 0,
            blink_phase: 0,
        }
    }

    // ── Transitions ───────────────────────────────────────────

    pub fn turn_on(&mut self) -> Option<Transition> {
        if self.powered {
            return None;
        }
        self.powered = true;
        self.changed = true;
        Some(Transition::PoweredOn)
    }

    pub fn turn_off(&mut self) -> Option<Transition> {
        if !self.powered {
            return None;
        }
        let stopped = self.running;
        if stopped {
            self.halt();
        }
        self.powered = false;
        self.running = false;
        self.paused = false;
        self.changed = true;
        Some(Transition::PoweredOff { stopped })
    }

    /// Start a cycle.  While running and paused this is a resume.
    pub fn start(&mut self) -> Option<Transition> {
        if !self.powered {
            return None;
        }
        if self.running {
            return if self.paused { self.resume() } else { None };
        }
        self.running = true;
        self.paused = false;
        self.phase = 0;
        self.blink_phase = 0;
        self.changed = true;
        Some(Transition::Started)
    }

    pub fn stop(&mut self) -> Option<Transition> {
        if !self.powered || !self.running {
            return None;
        }
        self.halt();
        self.changed = true;
        Some(Transition::Stopped)
    }

    pub fn pause(&mut self) -> Option<Transition> {
        if !self.running || self.paused {
            return None;
        }
        self.paused = true;
        self.blink_phase = 0;
        self.changed = true;
        Some(Transition::Paused)
    }

    pub fn resume(&mut self) -> Option<Transition> {
        if !self.running || !self.paused {
            return None;
        }
        self.paused = false;
        self.blink_phase = 0;
        self.changed = true;
        Some(Transition::Resumed)
    }

    /// Read-and-clear the dirty flag.
    pub fn take_changed(&mut self) -> bool {
        core::mem::replace(&mut self.changed, false)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn powered(&self) -> bool {
        self.powered
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    /// Peek at the dirty flag without consuming it.
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn phase(&self) -> u32 {
        self.phase
    }

    pub fn blink_phase(&self) -> u32 {
        self.blink_phase
    }

    // ── Internal ──────────────────────────────────────────────

    /// Advance the cursors by one tick.  Only the animator calls this; it
    /// never touches the power/run/pause flags or the dirty flag.
    pub(crate) fn advance_cursors(&mut self) {
        if !self.running {
            return;
        }
        if !self.paused {
            self.phase = (self.phase + CURSOR_STEP) % PHASE_WRAP;
        }
        self.blink_phase = (self.blink_phase + CURSOR_STEP) % BLINK_WRAP;
    }

    fn halt(&mut self) {
        self.running = false;
        self.paused = false;
        self.phase = 0;
        self.blink_phase = 0;
    }
}
