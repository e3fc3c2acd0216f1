//! LCD panel driver.
//!
//! ## Dual-target design
//!
//! The washer face only needs three primitives (clear, arc, rect).  The
//! panel itself is an external collaborator; this driver keeps a bounded
//! history of the most recent draw operations so the simulator and the
//! tests can inspect what would be on screen, and traces every operation to
//! the log.

use heapless::Deque;
use log::trace;

use crate::app::ports::{DisplayPort, Rgb888};

/// Number of draw operations kept for inspection.
pub const HISTORY_CAP: usize = 64;

/// One primitive as issued to the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOp {
    Clear(Rgb888),
    Arc {
        cx: i32,
        cy: i32,
        radius: u32,
        thickness: u32,
        start_deg: u32,
        end_deg: u32,
        colour: Rgb888,
    },
    Rect {
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        colour: Rgb888,
    },
}

pub struct SimLcd {
    history: Deque<DrawOp, HISTORY_CAP>,
    op_count: u64,
}

impl Default for SimLcd {
    fn default() -> Self {
        Self::new()
    }
}

impl SimLcd {
    pub fn new() -> Self {
        Self {
            history: Deque::new(),
            op_count: 0,
        }
    }

    /// Most recent operations, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &DrawOp> {
        self.history.iter()
    }

    pub fn last(&self) -> Option<&DrawOp> {
        self.history.back()
    }

    /// Total operations issued since construction.
    pub fn op_count(&self) -> u64 {
        self.op_count
    }

    /// Colour of the latest rect drawn with its corner at `(x, y)`, if it
    /// is still in the history window.
    pub fn rect_colour_at(&self, x: i32, y: i32) -> Option<Rgb888> {
        self.history.iter().rev().find_map(|op| match *op {
            DrawOp::Rect { x: rx, y: ry, colour, .. } if rx == x && ry == y => Some(colour),
            _ => None,
        })
    }

    fn push(&mut self, op: DrawOp) {
        trace!("lcd: {:?}", op);
        if self.history.is_full() {
            self.history.pop_front();
        }
        // Cannot fail: a slot was freed above.
        let _ = self.history.push_back(op);
        self.op_count += 1;
    }
}

impl DisplayPort for SimLcd {
    fn clear(&mut self, colour: Rgb888) {
        self.push(DrawOp::Clear(colour));
    }

    fn arc(
        &mut self,
        cx: i32,
        cy: i32,
        radius: u32,
        thickness: u32,
        start_deg: u32,
        end_deg: u32,
        colour: Rgb888,
    ) {
        self.push(DrawOp::Arc {
            cx,
            cy,
            radius,
            thickness,
            start_deg,
            end_deg,
            colour,
        });
    }

    fn rect(&mut self, x: i32, y: i32, w: u32, h: u32, colour: Rgb888) {
        self.push(DrawOp::Rect { x, y, w, h, colour });
    }
}
