//! Peripheral drivers: front-panel buttons, LCD, animation tick timer.

pub mod button;
pub mod hw_timer;
pub mod lcd;
