//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules for the washer: the appliance
//! state machine, the tick animator, the face layout and the service that
//! ties them together.  All interaction with hardware and the network
//! happens through **port traits** defined in [`ports`], keeping this layer
//! fully testable without real peripherals.

pub mod animation;
pub mod commands;
pub mod events;
pub mod ports;
pub mod screen;
pub mod service;
pub mod shared;
pub mod state;
