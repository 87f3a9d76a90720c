//! Resolves the key-store and trust-store declaration of a listener into the TLS material the
//! session engine hands to its TLS layer.
//!
//! Only the choice of material and policy happens here. The files are opaque: their contents are
//! consumed by the TLS implementation of the session engine.

use crate::{
    config::{KeystoreConfig, SslConfig, TruststoreConfig},
    options::{ClientAuth, DEFAULT_STORE_ALGORITHM, DEFAULT_STORE_TYPE, DEFAULT_TLS_PROTOCOL},
};
use std::{
    fmt::{self, Debug, Formatter},
    fs::File,
    path::{Path, PathBuf},
};

/// TLS policy and material of a listener.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TlsSpec {
    /// TLS protocol name.
    pub protocol: String,
    /// Whether clients are asked for a certificate.
    pub client_auth: ClientAuth,
    /// Enabled cipher suites without duplicates, in declaration order. Empty means the
    /// platform default set, not "no suites".
    pub cipher_suites: Vec<String>,
    /// Private key material.
    pub keystore: KeystoreRef,
    /// Trusted certificates for verifying clients.
    pub truststore: Option<TruststoreRef>,
}

/// Private key material.
#[derive(Clone, PartialEq, Eq)]
pub struct KeystoreRef {
    /// The key-store file.
    pub file: PathBuf,
    /// Password of the key-store.
    pub store_password: Option<String>,
    /// Password of the key. Falls back to the key-store password.
    pub key_password: Option<String>,
    /// Alias of the key. Falls back to the file name of the key-store.
    pub key_alias: String,
    /// Key-store format.
    pub store_type: String,
    /// Key manager algorithm.
    pub store_algorithm: String,
}

/// Trusted certificate material.
#[derive(Clone, PartialEq, Eq)]
pub struct TruststoreRef {
    /// The trust-store file.
    pub file: PathBuf,
    /// Password of the trust-store.
    pub password: Option<String>,
    /// Trust-store format.
    pub store_type: String,
    /// Trust manager algorithm.
    pub algorithm: String,
}

fn redacted(secret: &Option<String>) -> Option<&'static str> {
    secret.as_ref().map(|_| "***")
}

impl Debug for KeystoreRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeystoreRef")
            .field("file", &self.file)
            .field("store_password", &redacted(&self.store_password))
            .field("key_password", &redacted(&self.key_password))
            .field("key_alias", &self.key_alias)
            .field("store_type", &self.store_type)
            .field("store_algorithm", &self.store_algorithm)
            .finish()
    }
}

impl Debug for TruststoreRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TruststoreRef")
            .field("file", &self.file)
            .field("password", &redacted(&self.password))
            .field("store_type", &self.store_type)
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

/// Resolves the `ssl` section of a listener.
///
/// Returns `None`, meaning plaintext only, if no key-store file is declared. Whether the
/// declared client authentication can be honoured with the resolved trust-store is checked when
/// the server is assembled, not here.
pub fn resolve(config: &SslConfig) -> Option<TlsSpec> {
    let keystore = resolve_keystore(&config.keystore)?;
    Some(TlsSpec {
        protocol: config.protocol.clone().unwrap_or_else(|| DEFAULT_TLS_PROTOCOL.to_string()),
        client_auth: config.client_authentication.unwrap_or_default(),
        cipher_suites: dedup(config.enabled_cipher_suites.as_deref().unwrap_or_default()),
        keystore,
        truststore: resolve_truststore(&config.truststore),
    })
}

fn resolve_keystore(config: &KeystoreConfig) -> Option<KeystoreRef> {
    let file = config.file.clone()?;
    let key_alias = match &config.key_alias {
        Some(alias) => alias.clone(),
        None => file_name(&file),
    };
    Some(KeystoreRef {
        store_password: config.password.clone(),
        key_password: config.key_password.clone().or_else(|| config.password.clone()),
        key_alias,
        store_type: config.store_type.clone().unwrap_or_else(|| DEFAULT_STORE_TYPE.to_string()),
        store_algorithm: config.algorithm.clone().unwrap_or_else(|| DEFAULT_STORE_ALGORITHM.to_string()),
        file,
    })
}

fn resolve_truststore(config: &TruststoreConfig) -> Option<TruststoreRef> {
    Some(TruststoreRef {
        file: config.file.clone()?,
        password: config.password.clone(),
        store_type: config.store_type.clone().unwrap_or_else(|| DEFAULT_STORE_TYPE.to_string()),
        algorithm: config.algorithm.clone().unwrap_or_else(|| DEFAULT_STORE_ALGORITHM.to_string()),
    })
}

// A path without a final component (e.g. `..`) is used whole.
fn file_name(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.to_string_lossy().into_owned(),
    }
}

fn dedup(suites: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(suites.len());
    for suite in suites {
        if !unique.contains(suite) {
            unique.push(suite.clone());
        }
    }
    unique
}

impl TlsSpec {
    /// The key material files this spec refers to.
    pub fn material_files(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.keystore.file.as_path()).chain(self.truststore.iter().map(|t| t.file.as_path()))
    }
}

/// Checks that a key material file can be opened for reading.
pub(crate) fn check_readable(path: &Path) -> std::io::Result<()> {
    let file = File::open(path)?;
    if file.metadata()?.is_dir() {
        return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, "is a directory"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn with_keystore(file: &str) -> SslConfig {
        SslConfig {
            keystore: KeystoreConfig {
                file: Some(PathBuf::from(file)),
                password: Some("secret".to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn no_keystore_means_plaintext() {
        let config = SslConfig {
            protocol: Some("TLSv1.2".to_string()),
            truststore: TruststoreConfig {
                file: Some(PathBuf::from("conf/truststore.jks")),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(resolve(&config), None);
    }

    #[test]
    fn defaults_when_only_keystore_file_given() {
        let config = SslConfig {
            keystore: KeystoreConfig {
                file: Some(PathBuf::from("conf/ftpserver.jks")),
                ..Default::default()
            },
            ..Default::default()
        };
        let tls = resolve(&config).unwrap();
        assert_eq!(tls.protocol, "TLS");
        assert_eq!(tls.client_auth, ClientAuth::None);
        assert!(tls.cipher_suites.is_empty());
        assert_eq!(tls.keystore.store_password, None);
        assert_eq!(tls.keystore.key_password, None);
        assert_eq!(tls.keystore.store_type, "JKS");
        assert_eq!(tls.keystore.store_algorithm, "SunX509");
        assert_eq!(tls.truststore, None);
    }

    #[test]
    fn key_password_falls_back_to_store_password() {
        let tls = resolve(&with_keystore("conf/ftpserver.jks")).unwrap();
        assert_eq!(tls.keystore.key_password.as_deref(), Some("secret"));

        let mut config = with_keystore("conf/ftpserver.jks");
        config.keystore.key_password = Some("other".to_string());
        let tls = resolve(&config).unwrap();
        assert_eq!(tls.keystore.key_password.as_deref(), Some("other"));
        assert_eq!(tls.keystore.store_password.as_deref(), Some("secret"));
    }

    #[test]
    fn key_alias_falls_back_to_file_name() {
        let tls = resolve(&with_keystore("conf/ftpserver.jks")).unwrap();
        assert_eq!(tls.keystore.key_alias, "ftpserver.jks");

        let mut config = with_keystore("conf/ftpserver.jks");
        config.keystore.key_alias = Some("server".to_string());
        assert_eq!(resolve(&config).unwrap().keystore.key_alias, "server");
    }

    #[test]
    fn cipher_suites_keep_first_occurrence_order() {
        let mut config = with_keystore("k.p12");
        config.enabled_cipher_suites = Some(vec![
            "TLS_AES_256_GCM_SHA384".to_string(),
            "TLS_AES_128_GCM_SHA256".to_string(),
            "TLS_AES_256_GCM_SHA384".to_string(),
        ]);
        let tls = resolve(&config).unwrap();
        assert_eq!(tls.cipher_suites, vec!["TLS_AES_256_GCM_SHA384".to_string(), "TLS_AES_128_GCM_SHA256".to_string()]);
    }

    #[test]
    fn truststore_resolved_independently() {
        let mut config = with_keystore("conf/ftpserver.jks");
        config.client_authentication = Some(ClientAuth::Need);
        config.truststore = TruststoreConfig {
            file: Some(PathBuf::from("conf/truststore.jks")),
            store_type: Some("PKCS12".to_string()),
            ..Default::default()
        };
        let tls = resolve(&config).unwrap();
        let truststore = tls.truststore.clone().unwrap();
        assert_eq!(truststore.file, PathBuf::from("conf/truststore.jks"));
        assert_eq!(truststore.password, None);
        assert_eq!(truststore.store_type, "PKCS12");
        assert_eq!(truststore.algorithm, "SunX509");
        let files: Vec<&Path> = tls.material_files().collect();
        assert_eq!(files, vec![Path::new("conf/ftpserver.jks"), Path::new("conf/truststore.jks")]);
    }

    #[test]
    fn debug_hides_passwords() {
        let tls = resolve(&with_keystore("conf/ftpserver.jks")).unwrap();
        assert!(!format!("{:?}", tls).contains("secret"));
    }

    #[test]
    fn readable_check() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(check_readable(file.path()).is_ok());
        assert!(check_readable(Path::new("/nonexistent/ftpserver.jks")).is_err());
        assert!(check_readable(&std::env::temp_dir()).is_err());
    }
}
