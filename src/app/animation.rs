//! Tick animator: per-period frame computation.
//!
//! Runs once per tick period while a cycle is armed.  Two independent blink
//! signals come out of the cursors:
//!
//! | Signal            | Cursor        | Mask                         | Set bit        |
//! |-------------------|---------------|------------------------------|----------------|
//! | Running indicator | `blink_phase` | `0x800` running, `0x100` paused | indicator off  |
//! | Sweep colour      | `phase`       | `0x20`                       | tumbler colour |
//!
//! The paused mask blinks eight times faster.  The animator only reads the
//! power/run/pause flags; the cursors are the only thing it advances.

use super::ports::Rgb888;
use super::screen::{RUNNING_OFF, RUNNING_ON, TUMBLER_ON, WATER};
use super::state::{ApplianceState, CURSOR_STEP};

/// Blink mask while the drum is turning.
pub const RUNNING_BLINK_MASK: u32 = 0x800;
/// Blink mask while paused.
pub const PAUSED_BLINK_MASK: u32 = 0x100;
/// Sweep colour alternates every other step.
pub const SWEEP_MASK: u32 = 0x20;

/// The arc slice repainted on this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sweep {
    pub start_deg: u32,
    pub end_deg: u32,
    pub colour: Rgb888,
}

/// What one tick draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// Water-only ring, running indicator off.  Also covers a tick that was
    /// already in flight when the cycle stopped.
    Idle,
    Running { indicator: Rgb888, sweep: Sweep },
}

/// Compute the frame for the current state, then advance the cursors.
pub fn tick(state: &mut ApplianceState) -> Frame {
    if !state.running() {
        return Frame::Idle;
    }

    let mask = if state.paused() {
        PAUSED_BLINK_MASK
    } else {
        RUNNING_BLINK_MASK
    };
    let indicator = if state.blink_phase() & mask != 0 {
        RUNNING_OFF
    } else {
        RUNNING_ON
    };

    let phase = state.phase();
    let colour = if phase & SWEEP_MASK != 0 { TUMBLER_ON } else { WATER };
    let start_deg = phase % 360;
    let frame = Frame::Running {
        indicator,
        sweep: Sweep {
            start_deg,
            end_deg: start_deg + CURSOR_STEP,
            colour,
        },
    };

    state.advance_cursors();
    frame
}
