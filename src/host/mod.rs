//! Transport adapter for hosting processes.
//!
//! The navigator itself knows nothing about transports; this module maps
//! newline-delimited JSON messages onto its operations.

pub mod protocol;
pub mod server;

pub use protocol::{ErrorObject, IncomingMessage, OutgoingMessage, Payload, WireLocation};
pub use server::{Flow, Host, LEGACY_REFRESH_METHOD};
