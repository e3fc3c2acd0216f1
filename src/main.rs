//! Washer firmware main entry point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  SimLcd          TickTimer       LogEventSink    WifiAdapter   │
//! │  (Display)       (TickTimer)     (EventSink)     (Connectivity)│
//! │  ButtonBank / ConsoleInput       CommandChannel  HttpReporter  │
//! │  (Input)                         (UDP commands)  (Report)      │
//! │                                  HttpControl                   │
//! │                                  (HTTP commands)               │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │          WasherService (pure logic)                    │    │
//! │  │  ApplianceState · TickAnimator · Screen                │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Runtime poll loop (main task) · tick timer (timer task)       │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use core::time::Duration;

use anyhow::{Context, Result};
use log::info;

use washer::adapters::log_sink::LogEventSink;
use washer::app::service::WasherService;
use washer::app::shared::SharedWasher;
use washer::drivers::hw_timer::tick_timer;
use washer::drivers::lcd::SimLcd;
use washer::net::channel::CommandChannel;
use washer::net::http_control::HttpControl;
use washer::net::report::{HttpReporter, StateReporter};
use washer::runtime::Runtime;

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    platform::init_logging()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Washer v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let mut config = platform::load_config()?;
    config.normalize();
    config.validate().context("invalid configuration")?;
    info!(
        "Config: device_id='{}' udp={} http={} reporting={}",
        config.device_id,
        config.udp_port,
        config.http_port,
        config.project_id.as_deref().unwrap_or("off")
    );

    // ── 3. Network + front panel ──────────────────────────────
    let board = platform::bring_up(&config)?;

    // ── 4. Domain service ─────────────────────────────────────
    let (timer, driver) = tick_timer(Duration::from_millis(u64::from(config.tick_period_ms)));
    let mut service = WasherService::new(SimLcd::new(), timer, LogEventSink::new());
    service.boot();
    let washer = SharedWasher::new(service);

    // ── 5. Animation tick ─────────────────────────────────────
    let ticker = washer.clone();
    let _tick = driver.start(move || {
        ticker.with(|svc| {
            svc.tick();
        });
    })?;

    // ── 6. Command channel, HTTP control + reporter ───────────
    let channel = CommandChannel::bind(&config)?;
    let _control = HttpControl::spawn(config.http_port, washer.clone())?;
    let reporter = match config.report_url() {
        Some(url) => {
            info!("Reporting state to {}", url);
            Some(HttpReporter::new(url)?)
        }
        None => {
            info!("No project id configured; state reporting disabled");
            None
        }
    };

    // ── 7. Poll loop ──────────────────────────────────────────
    let platform::Board { input, _network } = board;
    Runtime::new(washer, channel, StateReporter::new(reporter), input).run()
}

// ── Host simulator ────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
mod platform {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;
    use log::info;
    use tracing_subscriber::EnvFilter;

    use washer::adapters::console_input::ConsoleInput;
    use washer::adapters::wifi::{ConnectivityPort, WifiAdapter};
    use washer::config::{ConfigError, WasherConfig};

    /// Networked washing-machine simulator.
    ///
    /// Answers local-home discovery and single-byte commands on UDP, and
    /// reads button presses (a / b / c) from stdin.
    #[derive(Parser, Debug)]
    #[command(name = "washer", version, about)]
    struct Cli {
        /// JSON config file; flags override its values.
        #[arg(long, env = "WASHER_CONFIG")]
        config: Option<PathBuf>,

        /// Identifier returned to discovery probes.
        #[arg(long, env = "WASHER_DEVICE_ID")]
        device_id: Option<String>,

        /// Cloud project receiving state reports.
        #[arg(long, env = "WASHER_PROJECT_ID")]
        project_id: Option<String>,

        /// Discovery token sent by the controller.
        #[arg(long, env = "WASHER_DISCOVERY_PACKET")]
        discovery_packet: Option<String>,

        /// UDP port for discovery and commands.
        #[arg(long, env = "WASHER_PORT")]
        port: Option<u16>,

        /// TCP port for the HTTP control endpoint.
        #[arg(long, env = "WASHER_HTTP_PORT")]
        http_port: Option<u16>,
    }

    pub struct Board {
        pub input: ConsoleInput,
        pub _network: Option<WifiAdapter>,
    }

    pub fn init_logging() -> Result<()> {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init()
            .map_err(|e| anyhow::anyhow!("logger init failed: {e}"))
    }

    pub fn load_config() -> Result<WasherConfig> {
        let cli = Cli::parse();

        let mut config = match &cli.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .map_err(|_| ConfigError::Io)
                    .with_context(|| format!("reading {}", path.display()))?;
                WasherConfig::from_json(&json)?
            }
            None => WasherConfig::default(),
        };

        if let Some(id) = cli.device_id {
            config.device_id = id;
        }
        if let Some(project) = cli.project_id {
            config.project_id = Some(project);
        }
        if let Some(token) = cli.discovery_packet {
            config.discovery_packet = token;
        }
        if let Some(port) = cli.port {
            config.udp_port = port;
        }
        if let Some(port) = cli.http_port {
            config.http_port = port;
        }
        Ok(config)
    }

    pub fn bring_up(config: &WasherConfig) -> Result<Board> {
        let network = if config.wifi_ssid.is_empty() {
            info!("WiFi(sim): no SSID configured, using host network");
            None
        } else {
            let mut wifi = WifiAdapter::new();
            wifi.set_credentials(&config.wifi_ssid, &config.wifi_key)?;
            wifi.connect_with_retry()?;
            Some(wifi)
        };
        info!("Buttons: type a (pause/resume), b (start/stop), c (power) + Enter");
        Ok(Board {
            input: ConsoleInput::spawn()?,
            _network: network,
        })
    }
}

// ── ESP32 device ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
mod platform {
    use anyhow::Result;
    use esp_idf_hal::gpio::{Gpio37, Gpio38, Gpio39, Input, PinDriver};
    use esp_idf_hal::peripherals::Peripherals;
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;

    use washer::adapters::wifi::{ConnectivityPort, WifiAdapter};
    use washer::config::WasherConfig;
    use washer::drivers::button::ButtonBank;

    type Button<P> = PinDriver<'static, P, Input>;

    pub struct Board {
        pub input: ButtonBank<Button<Gpio39>, Button<Gpio38>, Button<Gpio37>>,
        pub _network: WifiAdapter,
    }

    pub fn init_logging() -> Result<()> {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
        Ok(())
    }

    /// Device identity and credentials are baked in at build time.
    pub fn load_config() -> Result<WasherConfig> {
        let mut config = WasherConfig::default();
        if let Some(ssid) = option_env!("WASHER_WIFI_SSID") {
            config.wifi_ssid = ssid.into();
        }
        if let Some(key) = option_env!("WASHER_WIFI_KEY") {
            config.wifi_key = key.into();
        }
        if let Some(id) = option_env!("WASHER_DEVICE_ID") {
            config.device_id = id.into();
        }
        if let Some(project) = option_env!("WASHER_PROJECT_ID") {
            config.project_id = Some(project.into());
        }
        Ok(config)
    }

    pub fn bring_up(config: &WasherConfig) -> Result<Board> {
        let peripherals = Peripherals::take()?;
        let sysloop = EspSystemEventLoop::take()?;
        let nvs = EspDefaultNvsPartition::take().ok();

        let mut wifi = WifiAdapter::new(peripherals.modem, sysloop, nvs)?;
        wifi.set_credentials(&config.wifi_ssid, &config.wifi_key)?;
        wifi.connect_with_retry()?;

        // M5Stack buttons A/B/C, active low with external pull-ups.
        let input = ButtonBank::new(
            PinDriver::input(peripherals.pins.gpio39)?,
            PinDriver::input(peripherals.pins.gpio38)?,
            PinDriver::input(peripherals.pins.gpio37)?,
        );
        Ok(Board {
            input,
            _network: wifi,
        })
    }
}
