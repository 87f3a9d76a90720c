//! Contains the error type returned when resolving a configuration.

use derive_more::Display;
use std::path::PathBuf;
use thiserror::Error;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error returned when a configuration cannot be resolved into a
/// [`RuntimeServerDescriptor`](crate::RuntimeServerDescriptor).
///
/// These are fatal: the server must not start with a configuration that produced one.
#[derive(Debug, Error)]
#[error("configuration error: {kind}")]
pub struct ConfigError {
    kind: ConfigErrorKind,
    #[source]
    source: Option<BoxError>,
}

impl ConfigError {
    pub(crate) fn new<E>(kind: ConfigErrorKind, source: E) -> ConfigError
    where
        E: Into<BoxError>,
    {
        ConfigError {
            kind,
            source: Some(source.into()),
        }
    }

    /// Tells what was wrong with the configuration.
    pub fn kind(&self) -> &ConfigErrorKind {
        &self.kind
    }
}

impl From<ConfigErrorKind> for ConfigError {
    fn from(kind: ConfigErrorKind) -> ConfigError {
        ConfigError { kind, source: None }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::new(ConfigErrorKind::Document, e)
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::new(ConfigErrorKind::Document, e)
    }
}

/// The categories of [`ConfigError`].
#[derive(Clone, Eq, PartialEq, Debug, Display)]
pub enum ConfigErrorKind {
    /// Two listeners carry the same name.
    #[display("duplicate listener name '{_0}'")]
    DuplicateListener(String),
    /// Two users carry the same name.
    #[display("duplicate user name '{_0}'")]
    DuplicateUser(String),
    /// The listener asks for implicit TLS but declares no key-store file.
    #[display("listener '{_0}' requires implicit TLS but declares no key-store file")]
    ImplicitTlsWithoutKeystore(String),
    /// Nothing to listen on. Resolution always synthesizes a default listener so this indicates a
    /// bug rather than a bad configuration.
    #[display("no listeners after resolution")]
    NoListeners,
    /// The listener port is 0.
    #[display("listener '{_0}' must use a port between 1 and 65535")]
    InvalidPort(String),
    /// The passive port range of the listener could not be parsed.
    #[display("listener '{_0}' has an invalid passive port range")]
    InvalidPassivePorts(String),
    /// A blacklisted network of the listener is not in CIDR notation.
    #[display("listener '{_0}' blacklists a network that is not in CIDR notation")]
    InvalidNetwork(String),
    /// The listener wants or needs client certificates but declares no trust-store file.
    #[display("listener '{_0}' requests client certificates but declares no trust-store file")]
    ClientAuthWithoutTruststore(String),
    /// A declared key-store or trust-store file cannot be read.
    #[display("listener '{listener}' references key material '{}' that cannot be read", path.display())]
    KeyMaterialUnavailable {
        /// The listener declaring the file.
        listener: String,
        /// The file as declared.
        path: PathBuf,
    },
    /// The home directory of the user cannot be turned into an absolute path.
    #[display("home directory of user '{_0}' cannot be resolved")]
    InvalidHomeDirectory(String),
    /// The configuration document could not be read or parsed.
    #[display("could not read the configuration document")]
    Document,
}
