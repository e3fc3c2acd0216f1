//! Mock adapters for integration tests.
//!
//! Records every display, timer, event and report call so tests can assert
//! on the full history without a panel, a timer task or a network.

use std::collections::VecDeque;
use std::sync::{Mutex, Once};

use washer::app::commands::ButtonEvent;
use washer::app::events::AppEvent;
use washer::app::ports::{
    DisplayPort, EventSink, InputPort, ReportPort, Rgb888, StateReport, TickTimerPort,
};
use washer::error::ReportError;

// ── Display call record ───────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCall {
    Clear(Rgb888),
    Arc {
        radius: u32,
        start_deg: u32,
        end_deg: u32,
        colour: Rgb888,
    },
    Rect {
        x: i32,
        y: i32,
        colour: Rgb888,
    },
}

// ── MockDisplay ───────────────────────────────────────────────

#[derive(Default)]
pub struct MockDisplay {
    pub calls: Vec<DrawCall>,
}

#[allow(dead_code)]
impl MockDisplay {
    /// Colour of the last rect drawn at `(x, y)`.
    pub fn rect_colour_at(&self, x: i32, y: i32) -> Option<Rgb888> {
        self.calls.iter().rev().find_map(|c| match c {
            DrawCall::Rect { x: rx, y: ry, colour } if *rx == x && *ry == y => Some(*colour),
            _ => None,
        })
    }

    /// Arcs drawn at `radius`, in order.
    pub fn arcs_at(&self, radius: u32) -> Vec<(u32, u32, Rgb888)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Arc {
                    radius: r,
                    start_deg,
                    end_deg,
                    colour,
                } if *r == radius => Some((*start_deg, *end_deg, *colour)),
                _ => None,
            })
            .collect()
    }

    pub fn clear_history(&mut self) {
        self.calls.clear();
    }
}

impl DisplayPort for MockDisplay {
    fn clear(&mut self, colour: Rgb888) {
        self.calls.push(DrawCall::Clear(colour));
    }

    fn arc(
        &mut self,
        _cx: i32,
        _cy: i32,
        radius: u32,
        _thickness: u32,
        start_deg: u32,
        end_deg: u32,
        colour: Rgb888,
    ) {
        self.calls.push(DrawCall::Arc {
            radius,
            start_deg,
            end_deg,
            colour,
        });
    }

    fn rect(&mut self, x: i32, y: i32, _w: u32, _h: u32, colour: Rgb888) {
        self.calls.push(DrawCall::Rect { x, y, colour });
    }
}

// ── MockTimer ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockTimer {
    pub armed: bool,
    pub arms: u32,
    pub disarms: u32,
}

impl TickTimerPort for MockTimer {
    fn arm(&mut self) {
        self.armed = true;
        self.arms += 1;
    }

    fn disarm(&mut self) {
        self.armed = false;
        self.disarms += 1;
    }

    fn is_armed(&self) -> bool {
        self.armed
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── MockReporter ──────────────────────────────────────────────

#[derive(Default)]
pub struct MockReporter {
    pub sent: Vec<StateReport>,
    pub fail: bool,
}

impl ReportPort for MockReporter {
    fn report(&mut self, state: &StateReport) -> Result<(), ReportError> {
        self.sent.push(*state);
        if self.fail {
            Err(ReportError::Transport)
        } else {
            Ok(())
        }
    }
}

// ── ScriptedButtons ───────────────────────────────────────────

#[derive(Default)]
pub struct ScriptedButtons {
    pub queue: VecDeque<ButtonEvent>,
}

#[allow(dead_code)]
impl ScriptedButtons {
    pub fn press(&mut self, event: ButtonEvent) {
        self.queue.push_back(event);
    }
}

impl InputPort for ScriptedButtons {
    fn poll_press(&mut self) -> Option<ButtonEvent> {
        self.queue.pop_front()
    }
}

// ── CapturedLog ───────────────────────────────────────────────

/// Every `log` record emitted in this test binary, formatted as
/// `LEVEL message`.  Shared by all tests, so assertions search for a line
/// rather than expecting an exact history.
static LOG_LINES: Mutex<Vec<String>> = Mutex::new(Vec::new());

struct CapturedLog;

impl log::Log for CapturedLog {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        let line = format!("{} {}", record.level(), record.args());
        LOG_LINES.lock().unwrap().push(line);
    }

    fn flush(&self) {}
}

static CAPTURED_LOG: CapturedLog = CapturedLog;

/// Install the capturing logger once per test binary.
pub fn capture_logs() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        log::set_logger(&CAPTURED_LOG).expect("no other logger installed");
        log::set_max_level(log::LevelFilter::Trace);
    });
}

/// Whether any captured line contains `needle`.
pub fn logged(needle: &str) -> bool {
    LOG_LINES.lock().unwrap().iter().any(|line| line.contains(needle))
}
