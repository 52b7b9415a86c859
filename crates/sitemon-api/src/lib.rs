// sitemon-api: Async Rust client for the remote site monitoring service

pub mod client;
pub mod error;
pub mod transport;

pub use client::MonitorClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
