//! UDP command channel.
//!
//! Owns the non-blocking datagram socket and runs one receive per poll
//! cycle.  Discovery probes are answered directly; commands are handed to a
//! [`CommandHandler`]; everything else is logged and dropped.  Nothing a
//! peer sends can make a poll cycle fail.
//!
//! The socket sits behind [`DatagramTransport`] so the channel logic can be
//! driven by an in-memory transport as well as a real `UdpSocket`.

use core::time::Duration;
use std::io::ErrorKind;
use std::net::{Ipv4Addr, SocketAddr, UdpSocket};

use log::{info, warn};

use super::packet::{CommandPacket, RECV_BUF_LEN};
use crate::app::commands::WasherCommand;
use crate::app::ports::CommandHandler;
use crate::config::{ConfigError, DEVICE_ID_CAP, WasherConfig};
use crate::error::{CommsError, Error};

// ───────────────────────────────────────────────────────────────
// Transport
// ───────────────────────────────────────────────────────────────

/// Non-blocking datagram transport.
pub trait DatagramTransport {
    /// Receive one datagram.  `Ok(None)` when nothing is pending.
    fn recv_datagram(&mut self, buf: &mut [u8]) -> Result<Option<(usize, SocketAddr)>, CommsError>;

    /// Send one datagram to `to`.
    fn send_datagram(&mut self, data: &[u8], to: SocketAddr) -> Result<usize, CommsError>;
}

impl DatagramTransport for UdpSocket {
    fn recv_datagram(&mut self, buf: &mut [u8]) -> Result<Option<(usize, SocketAddr)>, CommsError> {
        match self.recv_from(buf) {
            Ok(received) => Ok(Some(received)),
            Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(None),
            Err(e) => {
                warn!("udp: receive failed: {}", e);
                Err(CommsError::RecvFailed)
            }
        }
    }

    fn send_datagram(&mut self, data: &[u8], to: SocketAddr) -> Result<usize, CommsError> {
        self.send_to(data, to).map_err(|e| {
            warn!("udp: send to {} failed: {}", to, e);
            CommsError::SendFailed
        })
    }
}

// ───────────────────────────────────────────────────────────────
// Channel
// ───────────────────────────────────────────────────────────────

/// Result of one poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Nothing pending; the cycle slept.
    Idle,
    /// A discovery probe was answered.
    Discovered(SocketAddr),
    /// A command was handed to the handler.
    Dispatched(WasherCommand),
    /// The datagram was logged and dropped.
    Ignored,
    /// The socket reported an error; the cycle slept.
    SocketError,
}

pub struct CommandChannel<S = UdpSocket> {
    socket: S,
    device_id: heapless::Vec<u8, DEVICE_ID_CAP>,
    discovery: heapless::Vec<u8, RECV_BUF_LEN>,
    idle_sleep: Duration,
}

impl CommandChannel<UdpSocket> {
    /// Bind `0.0.0.0:<udp_port>` in non-blocking mode.
    pub fn bind(config: &WasherConfig) -> Result<Self, Error> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, config.udp_port)).map_err(|e| {
            warn!("udp: bind to port {} failed: {}", config.udp_port, e);
            CommsError::BindFailed
        })?;
        socket
            .set_nonblocking(true)
            .map_err(|_| CommsError::NonBlockingFailed)?;
        let channel = Self::new(socket, config)?;
        info!("listening on port: {}", channel.local_port());
        Ok(channel)
    }

    /// Port actually bound (differs from the config when it asked for 0).
    pub fn local_port(&self) -> u16 {
        self.socket.local_addr().map_or(0, |a| a.port())
    }
}

impl<S: DatagramTransport> CommandChannel<S> {
    pub fn new(socket: S, config: &WasherConfig) -> Result<Self, Error> {
        let device_id = heapless::Vec::from_slice(config.device_id.as_bytes())
            .map_err(|()| ConfigError::ValidationFailed("device_id longer than 64 bytes"))?;
        let discovery = heapless::Vec::from_slice(config.discovery_packet.as_bytes()).map_err(
            |()| ConfigError::ValidationFailed("discovery_packet exceeds the 32-byte receive buffer"),
        )?;
        Ok(Self {
            socket,
            device_id,
            discovery,
            idle_sleep: Duration::from_millis(u64::from(config.idle_sleep_ms)),
        })
    }

    /// One receive attempt.  Sleeps `idle_sleep` when nothing is pending.
    pub fn poll_once(&mut self, handler: &mut impl CommandHandler) -> PollOutcome {
        let mut buf = [0u8; RECV_BUF_LEN];
        let (len, from) = match self.socket.recv_datagram(&mut buf) {
            Ok(Some(received)) => received,
            Ok(None) => {
                std::thread::sleep(self.idle_sleep);
                return PollOutcome::Idle;
            }
            Err(_) => {
                std::thread::sleep(self.idle_sleep);
                return PollOutcome::SocketError;
            }
        };

        let payload = &buf[..len];
        info!("received packet: {:?} from {}", String::from_utf8_lossy(payload), from);

        match CommandPacket::decode(payload, &self.discovery) {
            CommandPacket::Discovery => {
                // Send errors are logged by the transport.
                let _ = self.socket.send_datagram(&self.device_id, from);
                PollOutcome::Discovered(from)
            }
            CommandPacket::Command(cmd) => {
                handler.handle_command(cmd);
                PollOutcome::Dispatched(cmd)
            }
            CommandPacket::UnknownCommand(code) => {
                warn!("unrecognized command: {}", code);
                PollOutcome::Ignored
            }
            CommandPacket::Unrecognized => {
                warn!("unrecognized packet: {:?}", String::from_utf8_lossy(payload));
                PollOutcome::Ignored
            }
        }
    }

    pub fn transport(&self) -> &S {
        &self.socket
    }
}
