//! The service provider interface (SPI) for auth

use super::UserDetail;
use async_trait::async_trait;
use std::fmt::{self, Debug, Formatter};
use thiserror::Error;

/// Defines the requirements for Authentication implementations
#[async_trait]
pub trait Authenticator<User>: Sync + Send + Debug
where
    User: UserDetail,
{
    /// Authenticate the given credentials, returning the matching user on success.
    async fn authenticate(&self, creds: &Credentials) -> Result<User, AuthenticationError>;
}

/// The credentials a client presented when logging in.
///
/// This is a closed set. Authenticators match on it exhaustively so that adding a new kind of
/// credential forces every implementation to decide how to treat it.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// A user name with a password, sent through `USER` and `PASS`.
    Named {
        /// The user name as sent by the client.
        username: String,
        /// The password as sent by the client.
        password: String,
    },
    /// An anonymous login. Whatever the client sent as password is not part of the credential.
    Anonymous,
    /// A user name backed by the client certificate chain presented during the TLS handshake.
    Certificate {
        /// The user name as sent by the client.
        username: String,
        /// The DER encoded certificate chain, leaf first.
        chain: Vec<ClientCert>,
    },
}

impl Credentials {
    /// Creates [`Credentials::Named`] from a user name and password.
    pub fn named(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials::Named {
            username: username.into(),
            password: password.into(),
        }
    }

    /// The user name the client claims, if the credential carries one.
    pub fn username(&self) -> Option<&str> {
        match self {
            Credentials::Named { username, .. } | Credentials::Certificate { username, .. } => Some(username),
            Credentials::Anonymous => None,
        }
    }
}

// Passwords must never end up in logs.
impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Named { username, .. } => f.debug_struct("Named").field("username", username).field("password", &"***").finish(),
            Credentials::Anonymous => write!(f, "Anonymous"),
            Credentials::Certificate { username, chain } => f
                .debug_struct("Certificate")
                .field("username", username)
                .field("chain_len", &chain.len())
                .finish(),
        }
    }
}

/// A DER encoded X.509 client certificate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientCert(pub Vec<u8>);

impl AsRef<[u8]> for ClientCert {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// The error type for authentication errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthenticationError {
    /// The user does not exist or the password does not match.
    #[error("the ftp username or password is incorrect")]
    InvalidCredentials,
    /// An anonymous login was attempted but no anonymous account exists.
    #[error("anonymous login is not configured")]
    AnonymousNotConfigured,
    /// The caller presented a kind of credential the authenticator does not handle. This points
    /// at an integration defect and not at a mistake of the FTP client.
    #[error("credential kind not supported by this authenticator")]
    UnsupportedCredentialKind,
}

impl AuthenticationError {
    /// True if this error signals a caller defect rather than a routine failed login.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, AuthenticationError::UnsupportedCredentialKind)
    }
}
