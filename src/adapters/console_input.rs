//! Console stand-in for the front-panel buttons (simulator only).
//!
//! A reader thread turns lines on stdin into [`ButtonEvent`]s and queues
//! them on a channel; [`InputPort::poll_press`] drains one per call without
//! blocking.
//!
//! | Line            | Button | Event              |
//! |-----------------|--------|--------------------|
//! | `a` / `pause`   | A      | PauseResumeToggle  |
//! | `b` / `start`   | B      | StartStopToggle    |
//! | `c` / `power`   | C      | PowerToggle        |

use std::io::BufRead;
use std::sync::mpsc::{Receiver, TryRecvError, channel};

use log::{info, warn};

use crate::app::commands::ButtonEvent;
use crate::app::ports::InputPort;
use crate::error::Error;

pub struct ConsoleInput {
    rx: Receiver<ButtonEvent>,
}

impl ConsoleInput {
    /// Spawn the stdin reader thread.
    pub fn spawn() -> Result<Self, Error> {
        let (tx, rx) = channel();
        std::thread::Builder::new()
            .name("console".into())
            .spawn(move || {
                let stdin = std::io::stdin();
                for line in stdin.lock().lines() {
                    let Ok(line) = line else { break };
                    match parse_key(&line) {
                        Some(event) => {
                            if tx.send(event).is_err() {
                                break;
                            }
                        }
                        None if line.trim().is_empty() => {}
                        None => warn!("console: unknown key {:?} (a/b/c)", line.trim()),
                    }
                }
                info!("console: stdin closed");
            })
            .map_err(|_| Error::Init("console thread spawn failed"))?;
        Ok(Self { rx })
    }
}

impl InputPort for ConsoleInput {
    fn poll_press(&mut self) -> Option<ButtonEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

/// Map one console line to a button press.
pub fn parse_key(line: &str) -> Option<ButtonEvent> {
    match line.trim().to_ascii_lowercase().as_str() {
        "a" | "pause" => Some(ButtonEvent::PauseResumeToggle),
        "b" | "start" => Some(ButtonEvent::StartStopToggle),
        "c" | "power" => Some(ButtonEvent::PowerToggle),
        _ => None,
    }
}
