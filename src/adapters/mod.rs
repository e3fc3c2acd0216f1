//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter         | Implements        | Connects to              |
//! |-----------------|-------------------|--------------------------|
//! | `console_input` | InputPort         | stdin (simulator only)   |
//! | `log_sink`      | EventSink         | Serial / console log     |
//! | `wifi`          | ConnectivityPort  | ESP-IDF WiFi STA         |
//!
//! The display, tick timer and buttons live in [`crate::drivers`]; the
//! UDP channel and HTTP reporter in [`crate::net`].

#[cfg(not(target_os = "espidf"))]
pub mod console_input;
pub mod log_sink;
pub mod wifi;
