//! Washer configuration parameters
//!
//! Everything the firmware needs at startup: network identity, the UDP
//! and HTTP control ports, the optional state-report project, Wi-Fi
//! credentials and loop timing.  Supplied once at boot; there is no runtime reconfiguration.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::net::http_control::DEFAULT_HTTP_PORT;
use crate::net::packet::RECV_BUF_LEN;

/// Default UDP port the controller sends discovery probes and commands to.
pub const DEFAULT_UDP_PORT: u16 = 3311;

/// Default discovery token broadcast by the local-home controller.
pub const DEFAULT_DISCOVERY_PACKET: &str = "HelloLocalHomeSDK";

/// Upper bound for the device identifier sent in discovery replies.
pub const DEVICE_ID_CAP: usize = 64;

/// Core washer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WasherConfig {
    // --- Network identity ---
    /// UDP port bound on `0.0.0.0`
    pub udp_port: u16,
    /// TCP port of the HTTP control endpoint
    pub http_port: u16,
    /// Identifier returned verbatim to discovery probes
    pub device_id: String,
    /// Exact payload that identifies a discovery probe
    pub discovery_packet: String,
    /// Cloud project that receives state reports; `None` disables reporting
    pub project_id: Option<String>,

    // --- Wi-Fi ---
    pub wifi_ssid: String,
    pub wifi_key: String,

    // --- Timing ---
    /// Animation tick period (milliseconds)
    pub tick_period_ms: u32,
    /// Sleep after an empty socket read (milliseconds)
    pub idle_sleep_ms: u32,
}

impl Default for WasherConfig {
    fn default() -> Self {
        Self {
            udp_port: DEFAULT_UDP_PORT,
            http_port: DEFAULT_HTTP_PORT,
            device_id: String::from("deviceid123"),
            discovery_packet: String::from(DEFAULT_DISCOVERY_PACKET),
            project_id: None,

            wifi_ssid: String::new(),
            wifi_key: String::new(),

            tick_period_ms: 20, // 50 Hz animation
            idle_sleep_ms: 10,
        }
    }
}

impl WasherConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| {
            log::warn!("config: JSON parse error: {}", e);
            ConfigError::Parse
        })
    }

    /// Fold blank optional settings into "unset".  An empty project id
    /// turns reporting off rather than failing validation.
    pub fn normalize(&mut self) {
        if self.project_id.as_deref().is_some_and(|p| p.trim().is_empty()) {
            self.project_id = None;
        }
    }

    /// Reject values the firmware cannot operate with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.device_id.is_empty() {
            return Err(ConfigError::ValidationFailed("device_id must not be empty"));
        }
        if self.device_id.len() > DEVICE_ID_CAP {
            return Err(ConfigError::ValidationFailed("device_id longer than 64 bytes"));
        }
        if self.discovery_packet.is_empty() {
            return Err(ConfigError::ValidationFailed("discovery_packet must not be empty"));
        }
        // A one-byte token would be indistinguishable from a command code.
        if self.discovery_packet.len() == 1 {
            return Err(ConfigError::ValidationFailed("discovery_packet must be longer than one byte"));
        }
        if self.discovery_packet.len() > RECV_BUF_LEN {
            return Err(ConfigError::ValidationFailed("discovery_packet exceeds the 32-byte receive buffer"));
        }
        if self.tick_period_ms == 0 {
            return Err(ConfigError::ValidationFailed("tick_period_ms must be non-zero"));
        }
        if let Some(project) = &self.project_id {
            if !is_host_label(project) {
                return Err(ConfigError::ValidationFailed("project_id is not a valid host label"));
            }
        }
        Ok(())
    }

    /// State-report endpoint for the configured project, if any.
    pub fn report_url(&self) -> Option<String> {
        self.project_id
            .as_deref()
            .map(|project| format!("https://{project}.firebaseapp.com/updatestate"))
    }
}

/// `[a-z0-9-]{1,63}`, not starting or ending with a hyphen.
fn is_host_label(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= 63
        && !s.starts_with('-')
        && !s.ends_with('-')
        && s.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from loading or validating a [`WasherConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The config file could not be read.
    Io,
    /// The config document is not valid JSON for this schema.
    Parse,
    /// A field failed validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io => write!(f, "config file unreadable"),
            Self::Parse => write!(f, "config parse error"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
