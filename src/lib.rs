//! Configuration resolution and identity for an FTP(S) server.
//!
//! This crate turns a layered, mostly optional configuration document into an immutable
//! [`RuntimeServerDescriptor`]: the server-wide connection policy, one [`ListenerSpec`](listener::ListenerSpec)
//! per network endpoint (with its TLS material, data-channel policy and blacklist) and a
//! [`UserDirectory`](auth::UserDirectory) that answers the authentication and authorization
//! questions a session engine asks on every login.
//!
//! Missing pieces are filled in while resolving. No listeners means one listener named `default`
//! on port 21, no users means one `anonymous` account, a key-store without a key password uses the
//! store password, and so on. Problems such as duplicate names surface as a [`ConfigError`].
//!
//! # Quick Start
//!
//! ```rust
//! use unftp_autoconf::{RuntimeServerDescriptor, config::ServerConfig};
//!
//! let config = ServerConfig::from_json(r#"{
//!     "server": { "max-logins": 10 },
//!     "user": { "alice": { "user-password": "secret", "write-permission": true } }
//! }"#).unwrap();
//!
//! let descriptor = RuntimeServerDescriptor::from_config(&config).unwrap();
//! assert_eq!(descriptor.policy().max_logins, 10);
//! assert_eq!(descriptor.listeners()[0].port, 21);
//! assert!(descriptor.users().exists("alice"));
//! ```

pub mod auth;
pub mod config;
pub mod datachan;
mod error;
pub mod listener;
pub mod options;
mod server;
pub mod tls;

pub use crate::error::{ConfigError, ConfigErrorKind};
pub use crate::server::{RuntimeServerDescriptor, ServerBuilder, ServerPolicy};
