//! Washer face layout and redraw sequences.
//!
//! ```text
//!  (0,0) ┌──────────────────────────────────────────┐
//!        │                              [run][pwr]  │  rects at x=280 / x=300
//!        │            ╭────bezel────╮               │
//!        │          ╭──────door──────╮              │
//!        │          │   ╭tumbler─╮   │              │  centre (160,120)
//!        │          │   │ sweep  │   │              │
//!        │          ╰────────────────╯              │
//!        └──────────────────────────────────────────┘ (320,240)
//! ```
//!
//! Full rings are drawn as two half arcs (0–180°, 180–360°) because the
//! panel's arc primitive cannot span a full turn.

use super::animation::Frame;
use super::ports::{DisplayPort, Rgb888};

// ── Palette ───────────────────────────────────────────────────

pub const BACKGROUND: Rgb888 = 0xFF_FFFF;
pub const WATER: Rgb888 = 0x99_99FF;
pub const POWER_ON: Rgb888 = 0x00_FF00;
pub const POWER_OFF: Rgb888 = 0x55_5555;
pub const RUNNING_ON: Rgb888 = 0xFF_0000;
pub const RUNNING_OFF: Rgb888 = 0x55_5555;
pub const TUMBLER_ON: Rgb888 = 0xDD_DDDD;
pub const TUMBLER_OFF: Rgb888 = 0xCC_CCCC;
pub const DOOR_ON: Rgb888 = 0xFF_FFFF;
pub const DOOR_OFF: Rgb888 = 0xEE_EEEE;
pub const DOOR_BEZEL: Rgb888 = 0x55_5555;

// ── Geometry ──────────────────────────────────────────────────

pub const CENTRE: (i32, i32) = (160, 120);

/// A concentric ring around [`CENTRE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ring {
    pub radius: u32,
    pub thickness: u32,
}

pub const WATER_DISC: Ring = Ring { radius: 90, thickness: 90 };
pub const BEZEL: Ring = Ring { radius: 120, thickness: 10 };
pub const DOOR: Ring = Ring { radius: 110, thickness: 20 };
pub const TUMBLER: Ring = Ring { radius: 90, thickness: 20 };
pub const SWEEP: Ring = Ring { radius: 70, thickness: 2 };

/// A small square indicator LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indicator {
    pub x: i32,
    pub y: i32,
}

pub const INDICATOR_SIZE: u32 = 10;
pub const POWER_INDICATOR: Indicator = Indicator { x: 300, y: 20 };
pub const RUNNING_INDICATOR: Indicator = Indicator { x: 280, y: 20 };

// ── Primitives ────────────────────────────────────────────────

fn ring(display: &mut impl DisplayPort, ring: Ring, colour: Rgb888) {
    let (cx, cy) = CENTRE;
    display.arc(cx, cy, ring.radius, ring.thickness, 0, 180, colour);
    display.arc(cx, cy, ring.radius, ring.thickness, 180, 360, colour);
}

fn indicator(display: &mut impl DisplayPort, at: Indicator, colour: Rgb888) {
    display.rect(at.x, at.y, INDICATOR_SIZE, INDICATOR_SIZE, colour);
}

// ── Redraw sequences ──────────────────────────────────────────

/// Boot screen: washer powered off.
pub fn draw_boot(display: &mut impl DisplayPort) {
    display.clear(BACKGROUND);
    ring(display, WATER_DISC, WATER);
    ring(display, BEZEL, DOOR_BEZEL);
    ring(display, DOOR, DOOR_OFF);
    ring(display, TUMBLER, TUMBLER_OFF);
    indicator(display, POWER_INDICATOR, POWER_OFF);
    indicator(display, RUNNING_INDICATOR, RUNNING_OFF);
}

/// Power indicator, door and tumbler follow the power flag; the running
/// indicator is always dark after a power change.
pub fn draw_power(display: &mut impl DisplayPort, on: bool) {
    let (power, door, tumbler) = if on {
        (POWER_ON, DOOR_ON, TUMBLER_ON)
    } else {
        (POWER_OFF, DOOR_OFF, TUMBLER_OFF)
    };
    indicator(display, POWER_INDICATOR, power);
    indicator(display, RUNNING_INDICATOR, RUNNING_OFF);
    ring(display, DOOR, door);
    ring(display, TUMBLER, tumbler);
}

/// Cycle stopped: wipe the sweep ring back to water.
pub fn draw_stopped(display: &mut impl DisplayPort) {
    ring(display, SWEEP, WATER);
    indicator(display, RUNNING_INDICATOR, RUNNING_OFF);
}

/// Paint one animation frame.
pub fn draw_frame(display: &mut impl DisplayPort, frame: &Frame) {
    match frame {
        Frame::Idle => draw_stopped(display),
        Frame::Running { indicator: colour, sweep } => {
            indicator(display, RUNNING_INDICATOR, *colour);
            let (cx, cy) = CENTRE;
            display.arc(
                cx,
                cy,
                SWEEP.radius,
                SWEEP.thickness,
                sweep.start_deg,
                sweep.end_deg,
                sweep.colour,
            );
        }
    }
}
