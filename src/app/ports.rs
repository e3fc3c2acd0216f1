//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ WasherService (domain)
//! ```
//!
//! Driven adapters (display, tick timer, reporter, event sinks) implement
//! these traits.  The [`WasherService`](super::service::WasherService)
//! consumes them via generics, so the domain core never touches hardware,
//! sockets or HTTP directly.

use super::commands::{ButtonEvent, WasherCommand};
use crate::error::ReportError;

/// 24-bit `0xRRGGBB` colour as the panel driver expects it.
pub type Rgb888 = u32;

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → LCD)
// ───────────────────────────────────────────────────────────────

/// Write-only drawing primitives.  The domain never reads pixels back.
pub trait DisplayPort {
    /// Fill the whole screen.
    fn clear(&mut self, colour: Rgb888);

    /// Filled arc segment centred on `(cx, cy)`, `thickness` pixels wide
    /// inward from `radius`, from `start_deg` to `end_deg` clockwise.
    fn arc(
        &mut self,
        cx: i32,
        cy: i32,
        radius: u32,
        thickness: u32,
        start_deg: u32,
        end_deg: u32,
        colour: Rgb888,
    );

    /// Filled rectangle with its top-left corner at `(x, y)`.
    fn rect(&mut self, x: i32, y: i32, w: u32, h: u32, colour: Rgb888);
}

// ───────────────────────────────────────────────────────────────
// Tick timer port (driven adapter: domain → periodic timer)
// ───────────────────────────────────────────────────────────────

/// Arms and disarms the fixed-period animation tick.
///
/// A tick that was already in flight when `disarm` ran may still fire once;
/// the animator renders the idle frame in that case.
pub trait TickTimerPort {
    fn arm(&mut self);
    fn disarm(&mut self);
    fn is_armed(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Report port (driven adapter: domain → remote state endpoint)
// ───────────────────────────────────────────────────────────────

/// Wire snapshot of the three reported flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StateReport {
    pub on: bool,
    #[serde(rename = "isRunning")]
    pub is_running: bool,
    #[serde(rename = "isPaused")]
    pub is_paused: bool,
}

/// Publishes a state snapshot.  One attempt per call, no retry.
pub trait ReportPort {
    fn report(&mut self, state: &StateReport) -> Result<(), ReportError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Inbound ports (driving adapters: buttons / network → domain)
// ───────────────────────────────────────────────────────────────

/// Source of edge-triggered button presses.
pub trait InputPort {
    /// Next pending press, if any.  Never blocks.
    fn poll_press(&mut self) -> Option<ButtonEvent>;
}

/// Anything that accepts decoded network commands.
pub trait CommandHandler {
    fn handle_command(&mut self, cmd: WasherCommand);
}
