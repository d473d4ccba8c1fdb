//! # Embercloud
//!
//! Async client for the embercloud device service: password sign-in
//! with transparent token renewal, an authorized request gateway, and
//! typed decoding of the service's tagged-envelope documents.
//!
//! # Usage
//!
//! ```no_run
//! use embercloud::{Authenticator, CloudClient, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::new("api-key", "1:app:web:id");
//!     let gateway = Authenticator::new(config).login("pit@example.com", "secret").await?;
//!     let client = CloudClient::new(gateway);
//!
//!     let user = client.get_user().await?;
//!     println!("hello {}", user.display_name.as_deref().unwrap_or("there"));
//!     Ok(())
//! }
//! ```
//!
//! # Module organization
//!
//! - [`config`]: endpoint configuration, threaded explicitly
//! - [`auth`]: credential lifecycle and the authorized gateway
//! - [`client`]: typed resource fetches (user, device, device channel)
//! - [`errors`]: the error taxonomy callers branch on

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]

pub mod auth;
pub mod client;
pub mod config;
pub mod errors;

// Re-export commonly used types and functions
pub use auth::{AppConfig, Authenticator, AuthorizedClient, Authorizer, Credentials, TokenManager};
pub use client::CloudClient;
pub use config::Config;
// The data layer, for callers that work with records directly.
pub use embercloud_domain as domain;
pub use embercloud_domain::{Device, DeviceChannel, User};
pub use errors::{AuthFailureReason, Error, ErrorDetail, Result};
