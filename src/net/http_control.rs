//! HTTP control endpoint.
//!
//! The local-home app drives the washer over HTTP as well as UDP: an
//! EXECUTE intent becomes a `POST /` carrying a partial state document.
//!
//! ```text
//!   POST http://<device>:3388/
//!   Content-Type: application/json
//!
//!   {"on":true} | {"isRunning":false} | {"isPaused":true}
//! ```
//!
//! Each field present maps onto one guarded transition, applied in the
//! order `on`, `isRunning`, `isPaused`.  A field naming the state the
//! washer is already in is absorbed like any other no-op command.  The
//! reply is `OK`; a body that is not a JSON object of booleans gets `400`.
//!
//! - **`target_os = "espidf"`**: `EspHttpServer` handler.
//! - **all other targets**: `axum` router on a current-thread `tokio`
//!   runtime owned by a dedicated thread.

use log::{info, warn};
use serde::Deserialize;

use crate::app::commands::WasherCommand;
use crate::app::ports::CommandHandler;
use crate::error::CommsError;

/// Default port the local-home app posts commands to.
pub const DEFAULT_HTTP_PORT: u16 = 3388;

/// Largest request body accepted.
pub const MAX_BODY_LEN: usize = 256;

// ───────────────────────────────────────────────────────────────
// Partial state document
// ───────────────────────────────────────────────────────────────

/// Fields of a `POST /` body.  Absent fields leave that flag alone.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StatePatch {
    #[serde(default)]
    pub on: Option<bool>,
    #[serde(default, rename = "isRunning")]
    pub is_running: Option<bool>,
    #[serde(default, rename = "isPaused")]
    pub is_paused: Option<bool>,
}

impl StatePatch {
    pub fn parse(body: &[u8]) -> Result<Self, CommsError> {
        if body.len() > MAX_BODY_LEN {
            return Err(CommsError::BadRequest);
        }
        serde_json::from_slice(body).map_err(|_| CommsError::BadRequest)
    }

    /// Commands equivalent to this patch, in application order.
    pub fn commands(&self) -> impl Iterator<Item = WasherCommand> {
        let power = self
            .on
            .map(|on| if on { WasherCommand::On } else { WasherCommand::Off });
        let run = self
            .is_running
            .map(|run| if run { WasherCommand::Start } else { WasherCommand::Stop });
        let pause = self
            .is_paused
            .map(|pause| if pause { WasherCommand::Pause } else { WasherCommand::Resume });
        [power, run, pause].into_iter().flatten()
    }
}

/// Parse `body` and hand every resulting command to `handler`.
/// Returns how many commands were dispatched.
pub fn apply_body(handler: &mut impl CommandHandler, body: &[u8]) -> Result<usize, CommsError> {
    info!("http: state update {}", String::from_utf8_lossy(body));
    let patch = StatePatch::parse(body).inspect_err(|_| {
        warn!("http: rejected body {:?}", String::from_utf8_lossy(body));
    })?;
    let mut dispatched = 0;
    for cmd in patch.commands() {
        handler.handle_command(cmd);
        dispatched += 1;
    }
    Ok(dispatched)
}

// ───────────────────────────────────────────────────────────────
// Host server
// ───────────────────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
mod host {
    use std::net::{Ipv4Addr, SocketAddr};

    use axum::Router;
    use axum::body::Bytes;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::post;
    use log::{error, info, warn};

    use super::apply_body;
    use crate::app::ports::CommandHandler;
    use crate::error::CommsError;

    /// Running control server.  The server thread lives as long as the
    /// process; dropping the handle does not stop it.
    pub struct HttpControl {
        local_addr: SocketAddr,
        _worker: std::thread::JoinHandle<()>,
    }

    impl HttpControl {
        /// Bind `0.0.0.0:<port>` and serve `POST /` on a background thread.
        pub fn spawn<H>(port: u16, handler: H) -> Result<Self, CommsError>
        where
            H: CommandHandler + Clone + Send + Sync + 'static,
        {
            let listener = std::net::TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).map_err(|e| {
                warn!("http: bind to port {} failed: {}", port, e);
                CommsError::BindFailed
            })?;
            listener
                .set_nonblocking(true)
                .map_err(|_| CommsError::NonBlockingFailed)?;
            let local_addr = listener.local_addr().map_err(|_| CommsError::BindFailed)?;

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_io()
                .build()
                .map_err(|e| {
                    error!("http: runtime init failed: {}", e);
                    CommsError::HttpServer
                })?;

            let app = Router::new()
                .route("/", post(update_state::<H>))
                .with_state(handler);

            let worker = std::thread::Builder::new()
                .name("http-control".into())
                .spawn(move || {
                    runtime.block_on(async move {
                        let listener = match tokio::net::TcpListener::from_std(listener) {
                            Ok(l) => l,
                            Err(e) => {
                                error!("http: listener registration failed: {}", e);
                                return;
                            }
                        };
                        if let Err(e) = axum::serve(listener, app).await {
                            error!("http: server stopped: {}", e);
                        }
                    });
                })
                .map_err(|_| CommsError::HttpServer)?;

            info!("Device listening on port {}", local_addr.port());
            Ok(Self {
                local_addr,
                _worker: worker,
            })
        }

        pub fn local_addr(&self) -> SocketAddr {
            self.local_addr
        }
    }

    async fn update_state<H>(State(mut handler): State<H>, body: Bytes) -> (StatusCode, &'static str)
    where
        H: CommandHandler + Clone + Send + Sync + 'static,
    {
        match apply_body(&mut handler, &body) {
            Ok(_) => (StatusCode::OK, "OK"),
            Err(_) => (StatusCode::BAD_REQUEST, "bad request"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Device server
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
mod device {
    use std::net::{Ipv4Addr, SocketAddr};

    use esp_idf_svc::http::Method;
    use esp_idf_svc::http::server::{Configuration, EspHttpServer};
    use esp_idf_svc::io::{Read, Write};
    use log::{info, warn};

    use super::{MAX_BODY_LEN, apply_body};
    use crate::app::ports::CommandHandler;
    use crate::error::CommsError;

    pub struct HttpControl {
        local_addr: SocketAddr,
        _server: EspHttpServer<'static>,
    }

    impl HttpControl {
        pub fn spawn<H>(port: u16, handler: H) -> Result<Self, CommsError>
        where
            H: CommandHandler + Clone + Send + Sync + 'static,
        {
            let config = Configuration {
                http_port: port,
                ..Default::default()
            };
            let mut server = EspHttpServer::new(&config).map_err(|e| {
                warn!("http: server start on port {} failed: {}", port, e);
                CommsError::BindFailed
            })?;
            server
                .fn_handler("/", Method::Post, move |mut req| {
                    let mut body = [0u8; MAX_BODY_LEN + 1];
                    let mut filled = 0;
                    while filled < body.len() {
                        let n = req.read(&mut body[filled..])?;
                        if n == 0 {
                            break;
                        }
                        filled += n;
                    }
                    let mut handler = handler.clone();
                    match apply_body(&mut handler, &body[..filled]) {
                        Ok(_) => req.into_ok_response()?.write_all(b"OK"),
                        Err(_) => req
                            .into_status_response(400)?
                            .write_all(b"bad request"),
                    }
                })
                .map_err(|_| CommsError::HttpServer)?;

            info!("Device listening on port {}", port);
            Ok(Self {
                local_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
                _server: server,
            })
        }

        pub fn local_addr(&self) -> SocketAddr {
            self.local_addr
        }
    }
}

#[cfg(target_os = "espidf")]
pub use device::HttpControl;
#[cfg(not(target_os = "espidf"))]
pub use host::HttpControl;
