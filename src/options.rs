//! Contains the defaults applied during resolution and the option types shared by the
//! configuration document and the resolved descriptor.

use derive_more::Display;
use serde::Deserialize;
use std::{str::FromStr, time::Duration};
use thiserror::Error;

/// Name of the listener synthesized when none are declared.
pub const DEFAULT_LISTENER_NAME: &str = "default";
/// Control channel port used when a listener does not declare one.
pub const DEFAULT_PORT: u16 = 21;
/// Idle timeout of control and data connections.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(300);
/// TLS protocol name used when the listener declares key material but no protocol.
pub const DEFAULT_TLS_PROTOCOL: &str = "TLS";
/// Key-store and trust-store type.
pub const DEFAULT_STORE_TYPE: &str = "JKS";
/// Key-store and trust-store algorithm.
pub const DEFAULT_STORE_ALGORITHM: &str = "SunX509";

pub(crate) const DEFAULT_MAX_LOGINS: u32 = 16;
pub(crate) const DEFAULT_MAX_ANON_LOGINS: u32 = 16;
pub(crate) const DEFAULT_ANON_ENABLED: bool = true;
pub(crate) const DEFAULT_MAX_LOGIN_FAILURES: u32 = 3;
pub(crate) const DEFAULT_LOGIN_FAILURE_DELAY: Duration = Duration::from_millis(500);

/// Name of the account synthesized when no users are declared, and the account anonymous
/// logins map to.
pub const ANONYMOUS_USER: &str = "anonymous";
/// Home directory of a user that does not declare one, relative to the working directory.
pub const DEFAULT_HOME_DIRECTORY: &str = ".";
/// Transfer rate in bytes per second for users that do not declare one.
pub const DEFAULT_TRANSFER_RATE: u64 = 1024 * 1024;

/// Whether the server asks FTPS clients for a certificate during the TLS handshake.
#[derive(Debug, Display, Default, PartialEq, Eq, Clone, Copy, Deserialize)]
#[serde(try_from = "String")]
pub enum ClientAuth {
    /// No client certificate is requested.
    #[default]
    #[display("NONE")]
    None,
    /// A client certificate is requested but not required.
    #[display("WANT")]
    Want,
    /// A client certificate is required.
    #[display("NEED")]
    Need,
}

impl ClientAuth {
    /// True if the handshake may involve a client certificate, which needs a trust-store to verify.
    pub fn requests_certificate(&self) -> bool {
        !matches!(self, ClientAuth::None)
    }
}

/// Returned when a client authentication mode is not one of `NONE`, `WANT` or `NEED`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown client authentication mode '{0}'")]
pub struct UnknownClientAuth(String);

impl FromStr for ClientAuth {
    type Err = UnknownClientAuth;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NONE" => Ok(ClientAuth::None),
            "WANT" => Ok(ClientAuth::Want),
            "NEED" => Ok(ClientAuth::Need),
            _ => Err(UnknownClientAuth(s.to_string())),
        }
    }
}

impl TryFrom<String> for ClientAuth {
    type Error = UnknownClientAuth;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
