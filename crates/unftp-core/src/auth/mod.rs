//! Contains the [`Authenticator`], [`UserManager`] and [`UserDetail`] traits that an FTP session
//! engine consults when a client logs in.
//!
//! A session engine receives an implementation of these traits at startup and treats it as
//! read-only. For example, an `Authenticator` that admits a single hard-coded account:
//!
//! ```no_run
//! use async_trait::async_trait;
//! use std::fmt;
//! use unftp_core::auth::{AuthenticationError, Authenticator, Credentials, UserDetail};
//!
//! #[derive(Debug)]
//! struct Alice;
//!
//! impl UserDetail for Alice {
//!     fn username(&self) -> &str {
//!         "alice"
//!     }
//! }
//!
//! impl fmt::Display for Alice {
//!     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
//!         write!(f, "alice")
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct AliceOnly;
//!
//! #[async_trait]
//! impl Authenticator<Alice> for AliceOnly {
//!     async fn authenticate(&self, creds: &Credentials) -> Result<Alice, AuthenticationError> {
//!         match creds {
//!             Credentials::Named { username, password } if username == "alice" && password == "pw" => Ok(Alice),
//!             Credentials::Named { .. } => Err(AuthenticationError::InvalidCredentials),
//!             Credentials::Anonymous => Err(AuthenticationError::AnonymousNotConfigured),
//!             Credentials::Certificate { .. } => Err(AuthenticationError::UnsupportedCredentialKind),
//!         }
//!     }
//! }
//! ```
//!
//! [`Authenticator`]: trait.Authenticator.html
//! [`UserManager`]: trait.UserManager.html
//! [`UserDetail`]: trait.UserDetail.html

mod authenticator;
pub use authenticator::{AuthenticationError, Authenticator, ClientCert, Credentials};

mod manager;
pub use manager::{ADMIN_NAME, Operation, UnsupportedOperation, UserManager};

mod user;
pub use user::UserDetail;
