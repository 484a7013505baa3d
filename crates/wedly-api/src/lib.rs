// wedly-api: Async Rust client for the wedly guest-management REST API

pub mod auth;
pub mod client;
pub mod error;
pub mod guests;
pub mod models;
pub mod transport;
pub mod wedding;
pub mod wishes;

pub use client::{ApiClient, DEFAULT_BASE_URL};
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
