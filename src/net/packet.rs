//! Datagram decoding.
//!
//! ```text
//!  payload == discovery token  → Discovery
//!  len == 1, byte in 0..=5     → Command(OFF|ON|STOP|START|RESUME|PAUSE)
//!  len == 1, other byte        → UnknownCommand(byte)
//!  anything else               → Unrecognized
//! ```
//!
//! The discovery check runs first; configuration guarantees the token is
//! longer than one byte, so the two never overlap.

use crate::app::commands::WasherCommand;

/// Receive buffer size.  Longer datagrams are truncated by the socket and
/// can never match the token or a command.
pub const RECV_BUF_LEN: usize = 32;

/// A decoded datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandPacket {
    Discovery,
    Command(WasherCommand),
    UnknownCommand(u8),
    Unrecognized,
}

impl CommandPacket {
    pub fn decode(payload: &[u8], discovery_token: &[u8]) -> Self {
        if payload == discovery_token {
            return Self::Discovery;
        }
        match payload {
            [code] => WasherCommand::from_code(*code)
                .map_or(Self::UnknownCommand(*code), Self::Command),
            _ => Self::Unrecognized,
        }
    }
}
