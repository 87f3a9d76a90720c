use super::{RuntimeServerDescriptor, ServerPolicy, default_logger};
use crate::{
    auth::UserDirectory,
    error::{ConfigError, ConfigErrorKind},
    listener::ListenerSpec,
    tls,
};
use std::{collections::HashSet, sync::Arc};

/// Assembles a [`RuntimeServerDescriptor`] from resolved parts.
///
/// Assembly is all or nothing: [`build`](ServerBuilder::build) either returns a complete
/// descriptor or the first problem it found.
///
/// # Example
///
/// ```rust
/// use unftp_autoconf::{auth::UserDirectory, config::Declarations, listener, ServerBuilder, ServerPolicy};
///
/// let logger = slog::Logger::root(slog::Discard, slog::o!());
/// let listeners = listener::resolve(&Declarations::new()).unwrap();
/// let users = UserDirectory::resolve(&Declarations::new(), logger.clone()).unwrap();
///
/// let descriptor = ServerBuilder::new(ServerPolicy::default(), listeners, users)
///     .logger(Some(logger))
///     .build()
///     .unwrap();
/// assert_eq!(descriptor.listeners()[0].name, "default");
/// ```
pub struct ServerBuilder {
    policy: ServerPolicy,
    listeners: Vec<ListenerSpec>,
    users: UserDirectory,
    logger: slog::Logger,
}

impl ServerBuilder {
    /// Creates a builder for the given parts. Logging goes to the `log` crate unless
    /// [`logger`](ServerBuilder::logger) is called.
    pub fn new(policy: ServerPolicy, listeners: Vec<ListenerSpec>, users: UserDirectory) -> Self {
        ServerBuilder {
            policy,
            listeners,
            users,
            logger: default_logger(),
        }
    }

    /// Sets the structured logger. `None` restores the default.
    pub fn logger<L: Into<Option<slog::Logger>>>(mut self, logger: L) -> Self {
        self.logger = logger.into().unwrap_or_else(default_logger);
        self
    }

    /// Validates the parts and assembles the descriptor.
    ///
    /// Fails if there are no listeners, if listener names repeat, if a listener requires implicit
    /// TLS without key material, if a listener asks for client certificates without a
    /// trust-store, or if declared key material cannot be read.
    pub fn build(self) -> Result<RuntimeServerDescriptor, ConfigError> {
        let ServerBuilder {
            policy,
            listeners,
            users,
            logger,
        } = self;

        if listeners.is_empty() {
            return Err(ConfigErrorKind::NoListeners.into());
        }
        let mut names: HashSet<&str> = HashSet::with_capacity(listeners.len());
        for listener in &listeners {
            if !names.insert(listener.name.as_str()) {
                return Err(ConfigErrorKind::DuplicateListener(listener.name.clone()).into());
            }
            validate_tls(listener)?;
        }

        for listener in &listeners {
            slog::info!(logger, "Listener configured";
                "name" => &listener.name,
                "address" => %listener.socket_addr(),
                "tls" => listener.tls.is_some(),
                "implicit_tls" => listener.implicit_tls,
                "idle_timeout_secs" => listener.idle_timeout.as_secs());
        }
        slog::info!(logger, "User directory configured"; "users" => users.len(), "max_logins" => policy.max_logins, "anon_enabled" => policy.anon_login_enabled);

        Ok(RuntimeServerDescriptor::new(policy, listeners, Arc::new(users)))
    }
}

fn validate_tls(listener: &ListenerSpec) -> Result<(), ConfigError> {
    let Some(spec) = &listener.tls else {
        if listener.implicit_tls {
            return Err(ConfigErrorKind::ImplicitTlsWithoutKeystore(listener.name.clone()).into());
        }
        return Ok(());
    };
    if spec.client_auth.requests_certificate() && spec.truststore.is_none() {
        return Err(ConfigErrorKind::ClientAuthWithoutTruststore(listener.name.clone()).into());
    }
    for file in spec.material_files() {
        tls::check_readable(file).map_err(|e| {
            ConfigError::new(
                ConfigErrorKind::KeyMaterialUnavailable {
                    listener: listener.name.clone(),
                    path: file.to_path_buf(),
                },
                e,
            )
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Declarations,
        listener,
        options::ClientAuth,
        tls::{KeystoreRef, TlsSpec, TruststoreRef},
    };
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn logger() -> slog::Logger {
        slog::Logger::root(slog::Discard, slog::o!())
    }

    fn users() -> UserDirectory {
        UserDirectory::resolve(&Declarations::new(), logger()).unwrap()
    }

    fn plain(name: &str) -> ListenerSpec {
        listener::resolve_one(name, &Default::default()).unwrap()
    }

    fn tls_spec(keystore: PathBuf, truststore: Option<PathBuf>, client_auth: ClientAuth) -> TlsSpec {
        TlsSpec {
            protocol: "TLS".to_string(),
            client_auth,
            cipher_suites: vec![],
            keystore: KeystoreRef {
                file: keystore,
                store_password: None,
                key_password: None,
                key_alias: "key".to_string(),
                store_type: "JKS".to_string(),
                store_algorithm: "SunX509".to_string(),
            },
            truststore: truststore.map(|file| TruststoreRef {
                file,
                password: None,
                store_type: "JKS".to_string(),
                algorithm: "SunX509".to_string(),
            }),
        }
    }

    fn build(listeners: Vec<ListenerSpec>) -> Result<RuntimeServerDescriptor, ConfigError> {
        ServerBuilder::new(ServerPolicy::default(), listeners, users()).logger(logger()).build()
    }

    #[test]
    fn empty_listener_set_is_an_invariant_breach() {
        assert_eq!(build(vec![]).unwrap_err().kind(), &ConfigErrorKind::NoListeners);
    }

    #[test]
    fn duplicate_listener_names() {
        let err = build(vec![plain("a"), plain("a")]).unwrap_err();
        assert_eq!(err.kind(), &ConfigErrorKind::DuplicateListener("a".to_string()));
    }

    #[test]
    fn implicit_tls_needs_key_material() {
        let mut listener = plain("ftps");
        listener.implicit_tls = true;
        let err = build(vec![listener.clone()]).unwrap_err();
        assert_eq!(err.kind(), &ConfigErrorKind::ImplicitTlsWithoutKeystore("ftps".to_string()));

        let keystore = tempfile::NamedTempFile::new().unwrap();
        listener.tls = Some(tls_spec(keystore.path().to_path_buf(), None, ClientAuth::None));
        let descriptor = build(vec![listener]).unwrap();
        assert!(descriptor.listener("ftps").unwrap().implicit_tls);
    }

    #[test]
    fn client_auth_needs_truststore() {
        let keystore = tempfile::NamedTempFile::new().unwrap();
        let truststore = tempfile::NamedTempFile::new().unwrap();

        for mode in [ClientAuth::Want, ClientAuth::Need] {
            let mut listener = plain("ftps");
            listener.tls = Some(tls_spec(keystore.path().to_path_buf(), None, mode));
            let err = build(vec![listener]).unwrap_err();
            assert_eq!(err.kind(), &ConfigErrorKind::ClientAuthWithoutTruststore("ftps".to_string()));
        }

        let mut listener = plain("ftps");
        listener.tls = Some(tls_spec(keystore.path().to_path_buf(), Some(truststore.path().to_path_buf()), ClientAuth::Need));
        assert!(build(vec![listener]).is_ok());
    }

    #[test]
    fn unreadable_key_material() {
        let keystore = tempfile::NamedTempFile::new().unwrap();
        let missing = PathBuf::from("/nonexistent/truststore.jks");
        let mut listener = plain("ftps");
        listener.tls = Some(tls_spec(keystore.path().to_path_buf(), Some(missing.clone()), ClientAuth::Want));
        let err = build(vec![listener]).unwrap_err();
        assert_eq!(
            err.kind(),
            &ConfigErrorKind::KeyMaterialUnavailable {
                listener: "ftps".to_string(),
                path: missing,
            }
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn shares_the_user_directory() {
        let descriptor = build(vec![plain("a"), plain("b")]).unwrap();
        let users = Arc::clone(descriptor.users());
        assert!(users.exists("anonymous"));
        assert_eq!(descriptor.listeners().len(), 2);
    }
}
