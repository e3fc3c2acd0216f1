//! HTTP state reporter.
//!
//! After every poll cycle the runtime hands the consumed dirty flag and a
//! snapshot of the three reported flags to [`StateReporter::after_cycle`].
//! When the flag was set and an endpoint is configured, one JSON POST is
//! made:
//!
//! ```text
//!   POST https://<project-id>.firebaseapp.com/updatestate
//!   Content-Type: application/json
//!
//!   {"on":true,"isRunning":false,"isPaused":false}
//! ```
//!
//! An empty response body means accepted.  Failures are logged and dropped;
//! the change is not re-reported until the next transition.
//!
//! - **`target_os = "espidf"`**: `EspHttpConnection` with the certificate
//!   bundle attached.
//! - **all other targets**: `reqwest` blocking client.

use log::{error, info};

use crate::app::ports::{ReportPort, StateReport};
use crate::error::ReportError;

const REQUEST_TIMEOUT_SECS: u64 = 10;

// ───────────────────────────────────────────────────────────────
// HTTP adapter
// ───────────────────────────────────────────────────────────────

pub struct HttpReporter {
    url: String,
    #[cfg(not(target_os = "espidf"))]
    client: reqwest::blocking::Client,
}

impl HttpReporter {
    fn encode(state: &StateReport) -> Result<Vec<u8>, ReportError> {
        serde_json::to_vec(state).map_err(|_| ReportError::Transport)
    }

    fn check_body(body: &[u8]) -> Result<(), ReportError> {
        if body.is_empty() {
            Ok(())
        } else {
            Err(ReportError::Rejected(
                String::from_utf8_lossy(body).into_owned(),
            ))
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl HttpReporter {
    pub fn new(url: String) -> Result<Self, ReportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(core::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                error!("report: http client init failed: {}", e);
                ReportError::ClientInit
            })?;
        Ok(Self { url, client })
    }
}

#[cfg(not(target_os = "espidf"))]
impl ReportPort for HttpReporter {
    fn report(&mut self, state: &StateReport) -> Result<(), ReportError> {
        let body = Self::encode(state)?;
        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(|e| {
                log::warn!("report: request failed: {}", e);
                ReportError::Transport
            })?;
        let reply = response.bytes().map_err(|_| ReportError::Transport)?;
        Self::check_body(&reply)
    }
}

#[cfg(target_os = "espidf")]
impl HttpReporter {
    pub fn new(url: String) -> Result<Self, ReportError> {
        Ok(Self { url })
    }
}

#[cfg(target_os = "espidf")]
impl ReportPort for HttpReporter {
    fn report(&mut self, state: &StateReport) -> Result<(), ReportError> {
        use esp_idf_svc::http::Method;
        use esp_idf_svc::http::client::{Configuration, EspHttpConnection};
        use esp_idf_svc::io::{Read, Write};

        let body = Self::encode(state)?;
        let config = Configuration {
            crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
            timeout: Some(core::time::Duration::from_secs(REQUEST_TIMEOUT_SECS)),
            ..Default::default()
        };
        let mut conn = EspHttpConnection::new(&config).map_err(|_| ReportError::ClientInit)?;

        let len = body.len().to_string();
        let headers = [
            ("Content-Type", "application/json"),
            ("Content-Length", len.as_str()),
        ];
        conn.initiate_request(Method::Post, &self.url, &headers)
            .map_err(|_| ReportError::Transport)?;
        conn.write_all(&body).map_err(|_| ReportError::Transport)?;
        conn.initiate_response().map_err(|_| ReportError::Transport)?;

        let mut reply = [0u8; 128];
        let mut filled = 0;
        while filled < reply.len() {
            let n = conn
                .read(&mut reply[filled..])
                .map_err(|_| ReportError::Transport)?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        Self::check_body(&reply[..filled])
    }
}

// ───────────────────────────────────────────────────────────────
// Change-driven publisher
// ───────────────────────────────────────────────────────────────

/// What one call to [`StateReporter::after_cycle`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    /// No change this cycle, or no endpoint configured.
    Skipped,
    Sent,
    Failed(ReportError),
}

/// Publishes at most one report per cycle, only when the state changed.
pub struct StateReporter<R> {
    port: Option<R>,
}

impl<R: ReportPort> StateReporter<R> {
    /// `None` disables reporting; the dirty flag is still consumed by the
    /// caller every cycle.
    pub fn new(port: Option<R>) -> Self {
        Self { port }
    }

    pub fn is_enabled(&self) -> bool {
        self.port.is_some()
    }

    pub fn after_cycle(&mut self, changed: bool, state: &StateReport) -> ReportOutcome {
        let Some(port) = self.port.as_mut().filter(|_| changed) else {
            return ReportOutcome::Skipped;
        };
        info!("reporting state update");
        match port.report(state) {
            Ok(()) => ReportOutcome::Sent,
            Err(e) => {
                error!("error reporting state update: {}", e);
                ReportOutcome::Failed(e)
            }
        }
    }

    pub fn port(&self) -> Option<&R> {
        self.port.as_ref()
    }
}
