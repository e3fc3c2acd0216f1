//! Debounced front-panel buttons.
//!
//! ## Hardware
//!
//! Three active-low momentary switches (M5Stack A/B/C on GPIO 39/38/37)
//! with external pull-ups.  The main loop samples the pin levels every
//! cycle; each [`ButtonDriver`] runs a small debounce state machine and
//! reports a press once per physical push.
//!
//! | State        | Pin low                        | Pin high  |
//! |--------------|--------------------------------|-----------|
//! | Released     | → DebounceWait                 | stay      |
//! | DebounceWait | held ≥ 50 ms → Held, **press** | → Released (bounce) |
//! | Held         | stay                           | → Released |

use embedded_hal::digital::InputPin;
use heapless::Deque;

use crate::app::commands::ButtonEvent;
use crate::app::ports::InputPort;

const DEBOUNCE_MS: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DebounceState {
    Released,
    DebounceWait { since_ms: u32 },
    Held,
}

/// One debounced button bound to the event it produces.
pub struct ButtonDriver<P> {
    pin: P,
    event: ButtonEvent,
    state: DebounceState,
}

impl<P: InputPin> ButtonDriver<P> {
    pub fn new(pin: P, event: ButtonEvent) -> Self {
        Self {
            pin,
            event,
            state: DebounceState::Released,
        }
    }

    /// Sample the pin.  `now_ms` is monotonic milliseconds (wrapping).
    /// Returns the bound event on the sample that confirms a press.
    pub fn sample(&mut self, now_ms: u32) -> Option<ButtonEvent> {
        // A pin read error counts as released.
        let low = matches!(self.pin.is_low(), Ok(true));

        match (self.state, low) {
            (DebounceState::Released, true) => {
                self.state = DebounceState::DebounceWait { since_ms: now_ms };
                None
            }
            (DebounceState::DebounceWait { since_ms }, true) => {
                if now_ms.wrapping_sub(since_ms) >= DEBOUNCE_MS {
                    self.state = DebounceState::Held;
                    Some(self.event)
                } else {
                    None
                }
            }
            (_, false) => {
                self.state = DebounceState::Released;
                None
            }
            (DebounceState::Held, true) => None,
        }
    }
}

/// The three washer buttons as one [`InputPort`].
pub struct ButtonBank<A, B, C> {
    pause_resume: ButtonDriver<A>,
    start_stop: ButtonDriver<B>,
    power: ButtonDriver<C>,
    pending: Deque<ButtonEvent, 4>,
    epoch: std::time::Instant,
}

impl<A: InputPin, B: InputPin, C: InputPin> ButtonBank<A, B, C> {
    /// `a`, `b`, `c` are the left, middle and right button pins.
    pub fn new(a: A, b: B, c: C) -> Self {
        Self {
            pause_resume: ButtonDriver::new(a, ButtonEvent::PauseResumeToggle),
            start_stop: ButtonDriver::new(b, ButtonEvent::StartStopToggle),
            power: ButtonDriver::new(c, ButtonEvent::PowerToggle),
            pending: Deque::new(),
            epoch: std::time::Instant::now(),
        }
    }

    /// Sample all three buttons at `now_ms` and return the next press.
    pub fn poll_at(&mut self, now_ms: u32) -> Option<ButtonEvent> {
        if self.pending.is_empty() {
            let presses = [
                self.power.sample(now_ms),
                self.start_stop.sample(now_ms),
                self.pause_resume.sample(now_ms),
            ];
            for press in presses.into_iter().flatten() {
                // Capacity 4 ≥ three buttons; cannot overflow.
                let _ = self.pending.push_back(press);
            }
        }
        self.pending.pop_front()
    }
}

impl<A: InputPin, B: InputPin, C: InputPin> InputPort for ButtonBank<A, B, C> {
    fn poll_press(&mut self) -> Option<ButtonEvent> {
        let now_ms = self.epoch.elapsed().as_millis() as u32;
        self.poll_at(now_ms)
    }
}
