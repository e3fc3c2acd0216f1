//! Inbound commands to the washer service.
//!
//! Network commands arrive as single-byte codes; local buttons arrive as
//! toggle presses that the [`WasherService`](super::service::WasherService)
//! resolves against the current state.

/// Commands a controller can send over the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WasherCommand {
    Off = 0x00,
    On = 0x01,
    Stop = 0x02,
    Start = 0x03,
    Resume = 0x04,
    Pause = 0x05,
}

impl WasherCommand {
    /// Every command, in wire-code order.
    pub const ALL: [Self; 6] = [
        Self::Off,
        Self::On,
        Self::Stop,
        Self::Start,
        Self::Resume,
        Self::Pause,
    ];

    /// Decode a wire code.  `None` for anything outside `0..=5`.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0x00 => Some(Self::Off),
            0x01 => Some(Self::On),
            0x02 => Some(Self::Stop),
            0x03 => Some(Self::Start),
            0x04 => Some(Self::Resume),
            0x05 => Some(Self::Pause),
            _ => None,
        }
    }

    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Lower-case name used in log lines.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
            Self::Stop => "stop",
            Self::Start => "start",
            Self::Resume => "resume",
            Self::Pause => "pause",
        }
    }
}

/// The three front-panel buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    /// Button C.
    PowerToggle,
    /// Button B.
    StartStopToggle,
    /// Button A.
    PauseResumeToggle,
}
