//! WiFi station-mode adapter.
//!
//! Implements [`ConnectivityPort`], the boundary the startup code uses to
//! join the local network before the command socket is bound.  The washer
//! only needs one successful join at boot; a lost connection shows up as
//! silent sockets and failed reports, both of which are already tolerated.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `BlockingWifi<EspWifi>` in STA mode.
//! - **all other targets**: the host network is assumed to be up already;
//!   `connect` validates and records the credentials and returns.

use core::fmt;
use log::{info, warn};

#[cfg(target_os = "espidf")]
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};

// ── Port trait ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectivityError {
    /// `connect` was called before any SSID was set.
    NoCredentials,
    /// Empty, over 32 bytes, or not printable ASCII.
    InvalidSsid,
    /// Neither empty (open network) nor 8 to 64 bytes (WPA2).
    InvalidPassword,
    /// The driver could not associate or never got an address.
    ConnectionFailed,
    AlreadyConnected,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::NoCredentials => "no SSID configured",
            Self::InvalidSsid => "SSID must be 1-32 printable ASCII bytes",
            Self::InvalidPassword => "key must be empty (open) or 8-64 bytes (WPA2)",
            Self::ConnectionFailed => "association failed",
            Self::AlreadyConnected => "already associated",
        };
        write!(f, "wifi: {msg}")
    }
}

impl std::error::Error for ConnectivityError {}

/// Station-mode network association.
pub trait ConnectivityPort {
    fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError>;
    fn connect(&mut self) -> Result<(), ConnectivityError>;
    fn disconnect(&mut self);
    fn is_connected(&self) -> bool;
}

// ── Validation ──────────────────────────────────────────────

const SSID_MAX: usize = 32;
const KEY_LEN: core::ops::RangeInclusive<usize> = 8..=64;

fn check_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    let printable = ssid.bytes().all(|b| b.is_ascii_graphic() || b == b' ');
    if ssid.is_empty() || ssid.len() > SSID_MAX || !printable {
        return Err(ConnectivityError::InvalidSsid);
    }
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConnectivityError> {
    if key.is_empty() || KEY_LEN.contains(&key.len()) {
        Ok(())
    } else {
        Err(ConnectivityError::InvalidPassword)
    }
}

// ── WiFi adapter ────────────────────────────────────────────

/// Join attempts before giving up at boot.
const CONNECT_ATTEMPTS: u32 = 3;

pub struct WifiAdapter {
    associated: bool,
    ssid: heapless::String<32>,
    key: heapless::String<64>,
    #[cfg(target_os = "espidf")]
    wifi: BlockingWifi<EspWifi<'static>>,
}

impl WifiAdapter {
    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self {
            associated: false,
            ssid: heapless::String::new(),
            key: heapless::String::new(),
        }
    }

    #[cfg(target_os = "espidf")]
    pub fn new(
        modem: esp_idf_hal::modem::Modem,
        sysloop: esp_idf_svc::eventloop::EspSystemEventLoop,
        nvs: Option<esp_idf_svc::nvs::EspDefaultNvsPartition>,
    ) -> Result<Self, crate::error::Error> {
        let wifi = EspWifi::new(modem, sysloop.clone(), nvs)
            .map_err(|_| crate::error::Error::Init("wifi driver"))?;
        let wifi = BlockingWifi::wrap(wifi, sysloop)
            .map_err(|_| crate::error::Error::Init("wifi event loop"))?;
        Ok(Self {
            associated: false,
            ssid: heapless::String::new(),
            key: heapless::String::new(),
            wifi,
        })
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    /// Connect, retrying a few times.  Logs each failure.
    pub fn connect_with_retry(&mut self) -> Result<(), ConnectivityError> {
        let mut last = ConnectivityError::ConnectionFailed;
        for attempt in 1..=CONNECT_ATTEMPTS {
            match self.connect() {
                Ok(()) | Err(ConnectivityError::AlreadyConnected) => return Ok(()),
                Err(e @ (ConnectivityError::NoCredentials
                | ConnectivityError::InvalidSsid
                | ConnectivityError::InvalidPassword)) => return Err(e),
                Err(e) => {
                    warn!("WiFi: attempt {}/{} failed: {}", attempt, CONNECT_ATTEMPTS, e);
                    last = e;
                }
            }
        }
        Err(last)
    }

    // Target glue.

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self) -> Result<(), ConnectivityError> {
        use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};

        let auth_method = if self.key.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let client = ClientConfiguration {
            ssid: self
                .ssid
                .as_str()
                .try_into()
                .map_err(|()| ConnectivityError::InvalidSsid)?,
            password: self
                .key
                .as_str()
                .try_into()
                .map_err(|()| ConnectivityError::InvalidPassword)?,
            auth_method,
            ..Default::default()
        };
        self.wifi
            .set_configuration(&Configuration::Client(client))
            .map_err(|_| ConnectivityError::ConnectionFailed)?;
        if !self.wifi.is_started().unwrap_or(false) {
            self.wifi
                .start()
                .map_err(|_| ConnectivityError::ConnectionFailed)?;
        }
        self.wifi
            .connect()
            .map_err(|_| ConnectivityError::ConnectionFailed)?;
        self.wifi
            .wait_netif_up()
            .map_err(|_| ConnectivityError::ConnectionFailed)?;
        if let Ok(ip) = self.wifi.wifi().sta_netif().get_ip_info() {
            info!("WiFi: address {}", ip.ip);
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self) -> Result<(), ConnectivityError> {
        info!("WiFi(sim): using host network for '{}'", self.ssid);
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_disconnect(&mut self) {
        let _ = self.wifi.disconnect();
        let _ = self.wifi.stop();
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_disconnect(&mut self) {}

    #[cfg(target_os = "espidf")]
    fn platform_is_connected(&self) -> bool {
        self.associated && self.wifi.is_connected().unwrap_or(false)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_is_connected(&self) -> bool {
        self.associated
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for WifiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

// ── ConnectivityPort ────────────────────────────────────────

impl ConnectivityPort for WifiAdapter {
    fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError> {
        check_ssid(ssid)?;
        check_key(password)?;
        self.ssid.clear();
        self.ssid.push_str(ssid).map_err(|()| ConnectivityError::InvalidSsid)?;
        self.key.clear();
        self.key
            .push_str(password)
            .map_err(|()| ConnectivityError::InvalidPassword)?;
        info!("WiFi: credentials set (SSID='{}')", self.ssid);
        Ok(())
    }

    fn connect(&mut self) -> Result<(), ConnectivityError> {
        if self.ssid.is_empty() {
            return Err(ConnectivityError::NoCredentials);
        }
        if self.associated {
            return Err(ConnectivityError::AlreadyConnected);
        }
        info!("WiFi: joining '{}'", self.ssid);
        self.platform_connect()?;
        self.associated = true;
        info!("WiFi: connected");
        Ok(())
    }

    fn disconnect(&mut self) {
        self.platform_disconnect();
        self.associated = false;
        info!("WiFi: left network");
    }

    fn is_connected(&self) -> bool {
        self.platform_is_connected()
    }
}

// ── Tests ───────────────────────────────────────────────────
