//! Network side: UDP command channel, HTTP control endpoint and HTTP state
//! reporter.

pub mod channel;
pub mod http_control;
pub mod packet;
pub mod report;
