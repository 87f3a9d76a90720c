use super::{ServerBuilder, ServerPolicy, default_logger};
use crate::{
    auth::UserDirectory,
    config::ServerConfig,
    error::ConfigError,
    listener::{self, ListenerSpec},
    options::{DEFAULT_LISTENER_NAME, DEFAULT_PORT},
};
use std::sync::Arc;

/// The fully resolved and validated server configuration.
///
/// Immutable once built. It can be shared freely between the sessions of the session engine; the
/// user directory in particular is handed out as an [`Arc`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeServerDescriptor {
    policy: ServerPolicy,
    listeners: Vec<ListenerSpec>,
    users: Arc<UserDirectory>,
}

impl RuntimeServerDescriptor {
    pub(super) fn new(policy: ServerPolicy, listeners: Vec<ListenerSpec>, users: Arc<UserDirectory>) -> Self {
        RuntimeServerDescriptor { policy, listeners, users }
    }

    /// Resolves a configuration document, logging through the `log` crate.
    ///
    /// # Example
    ///
    /// ```rust
    /// use unftp_autoconf::{config::ServerConfig, RuntimeServerDescriptor};
    ///
    /// let config = ServerConfig::from_json("{}").unwrap();
    /// let descriptor = RuntimeServerDescriptor::from_config(&config).unwrap();
    ///
    /// assert_eq!(descriptor.listeners()[0].port, 21);
    /// assert!(descriptor.users().exists("anonymous"));
    /// ```
    pub fn from_config(config: &ServerConfig) -> Result<Self, ConfigError> {
        RuntimeServerDescriptor::from_config_with_logger(config, default_logger())
    }

    /// Resolves a configuration document with the given structured logger.
    pub fn from_config_with_logger(config: &ServerConfig, logger: slog::Logger) -> Result<Self, ConfigError> {
        let policy = ServerPolicy::resolve(&config.server);
        if config.server.listener.is_empty() {
            slog::debug!(logger, "No listeners declared, using the default listener"; "name" => DEFAULT_LISTENER_NAME, "port" => DEFAULT_PORT);
        }
        let listeners = listener::resolve(&config.server.listener)?;
        let users = UserDirectory::resolve(&config.user, logger.new(slog::o!("component" => "users")))?;
        ServerBuilder::new(policy, listeners, users).logger(logger).build()
    }

    /// Server wide connection limits.
    pub fn policy(&self) -> &ServerPolicy {
        &self.policy
    }

    /// The listeners in declaration order. Never empty.
    pub fn listeners(&self) -> &[ListenerSpec] {
        &self.listeners
    }

    /// The listener with this name.
    pub fn listener(&self, name: &str) -> Option<&ListenerSpec> {
        self.listeners.iter().find(|l| l.name == name)
    }

    /// The user directory.
    pub fn users(&self) -> &Arc<UserDirectory> {
        &self.users
    }
}
