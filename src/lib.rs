//! Washer firmware library.
//!
//! Exposes the application core, drivers and network layer for the binary
//! and for integration testing. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod net;
pub mod runtime;

// Host builds link the std critical-section implementation that
// embassy-sync's CriticalSectionRawMutex needs.
#[cfg(not(target_os = "espidf"))]
use critical_section as _;
