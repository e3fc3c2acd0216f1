//! Unified error types for the washer firmware.
//!
//! A single `Error` enum that every subsystem converts into, so startup code
//! in `main` handles failures uniformly.  Nothing in the running control loop
//! is fatal: per-cycle errors are logged at the point they occur and never
//! propagated out of the loop.

use core::fmt;

use crate::config::ConfigError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible startup operation in the firmware funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
    /// A communication subsystem failed.
    Comms(CommsError),
    /// Peripheral or timer initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    /// A UDP or TCP listening socket could not be bound.
    BindFailed,
    /// The socket could not be switched to non-blocking mode.
    NonBlockingFailed,
    /// A datagram receive failed for a reason other than would-block.
    RecvFailed,
    /// A datagram send failed.
    SendFailed,
    /// The HTTP control server could not be started.
    HttpServer,
    /// An HTTP control request body was not a valid state document.
    BadRequest,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BindFailed => write!(f, "socket bind failed"),
            Self::NonBlockingFailed => write!(f, "could not set socket non-blocking"),
            Self::RecvFailed => write!(f, "UDP receive failed"),
            Self::SendFailed => write!(f, "UDP send failed"),
            Self::HttpServer => write!(f, "HTTP control server failed"),
            Self::BadRequest => write!(f, "malformed control request"),
        }
    }
}

impl std::error::Error for CommsError {}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}

// ---------------------------------------------------------------------------
// State-report errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// The HTTP client could not be constructed.
    ClientInit,
    /// The request never produced a response (DNS, TLS, connect, timeout).
    Transport,
    /// The endpoint answered with a non-empty body, which it only does on
    /// failure.  Carries the body as text.
    Rejected(String),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClientInit => write!(f, "HTTP client init failed"),
            Self::Transport => write!(f, "request failed"),
            Self::Rejected(body) => write!(f, "endpoint rejected update: {body}"),
        }
    }
}

impl std::error::Error for ReportError {}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
