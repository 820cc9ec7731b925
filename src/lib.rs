//! HTTP relay that forwards SMS send requests to a third-party SMS gateway.
//!
//! The crate follows three layers plus an HTTP surface: a domain layer of
//! strong types, a transport layer for the JSON wire formats, a client layer
//! that talks to the gateway, and an axum [`server`] that composes them.
//!
//! ```rust,no_run
//! use sms_relay::{Credentials, GatewayClient, normalize};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = Credentials::from_raw("client-id", "client-secret")?;
//!     let client = GatewayClient::new(credentials, "https://gateway.example/sms".parse()?);
//!     let request = normalize(br#"{"number": "+15551234567", "message": "hi", "sender": "Acme"}"#)?;
//!     client.send(&request).await?;
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod domain;
pub mod logging;
pub mod server;
mod transport;

pub use client::{
    Credentials, GatewayClient, GatewayClientBuilder, GatewayError, LogObserver, ResponseObserver,
};
pub use config::{ConfigError, RelayConfig};
pub use domain::{
    ClientId, ClientSecret, GatewayRequest, GatewayResponse, InboundSms, RecipientInput,
    Recipients, SendOptions, SubaccountId, ValidationError,
};
pub use server::{AppState, RelayError};
pub use transport::normalize;
