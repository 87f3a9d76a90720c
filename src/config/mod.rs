//! The configuration document as written by the operator.
//!
//! Every setting is optional here. Defaults are applied later, when the document is resolved
//! into a [`RuntimeServerDescriptor`](crate::RuntimeServerDescriptor), so that absent and
//! explicitly configured values can be told apart. The key paths follow the document layout:
//!
//! ```json
//! {
//!   "server": {
//!     "max-logins": 16,
//!     "listener": {
//!       "ftps": {
//!         "port": 990,
//!         "implicit-ssl": true,
//!         "ssl": { "keystore": { "file": "conf/ftpserver.jks", "password": "secret" } }
//!       }
//!     }
//!   },
//!   "user": {
//!     "alice": { "user-password": "pw1", "home-directory": "/srv/ftp/alice", "write-permission": true }
//!   }
//! }
//! ```

mod declarations;
pub use declarations::Declarations;

use crate::{error::ConfigError, options::ClientAuth};
use serde::Deserialize;
use std::{fs, net::IpAddr, path::Path, path::PathBuf};

/// The root of the configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ServerConfig {
    /// Server wide connection limits and the listeners.
    pub server: ServerSection,
    /// User accounts keyed by user name.
    #[serde(alias = "users")]
    pub user: Declarations<UserConfig>,
}

impl ServerConfig {
    /// Reads the configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(filename: P) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(filename)?;
        ServerConfig::from_json(json)
    }

    /// Reads the configuration from a JSON string.
    pub fn from_json<T: AsRef<str>>(json: T) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json.as_ref())?)
    }
}

/// The `server` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ServerSection {
    /// Worker threads for the session engine. Defaults to the available parallelism.
    pub max_threads: Option<u32>,
    /// Concurrent logins over all users.
    pub max_logins: Option<u32>,
    /// Concurrent anonymous logins.
    pub max_anon_logins: Option<u32>,
    /// Whether anonymous logins are admitted at all.
    pub anon_enabled: Option<bool>,
    /// Failed logins before the session is closed.
    pub max_login_failures: Option<u32>,
    /// Delay after a failed login, in milliseconds.
    pub login_failure_delay: Option<u64>,
    /// Listeners keyed by listener name.
    #[serde(alias = "listeners")]
    pub listener: Declarations<ListenerConfig>,
}

/// A `server.listener.<name>` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ListenerConfig {
    /// Control channel port.
    pub port: Option<u16>,
    /// Address to bind to. All interfaces when absent.
    pub local_address: Option<IpAddr>,
    /// Control channel idle timeout in seconds, 0 for none.
    pub idle_timeout: Option<u64>,
    /// Whether clients must start TLS immediately after connecting.
    pub implicit_ssl: Option<bool>,
    /// TLS settings.
    pub ssl: SslConfig,
    /// Data channel settings.
    pub data_connection: DataConnectionConfig,
    /// Denied client addresses.
    pub blacklist: BlacklistConfig,
}

/// The `ssl` section of a listener.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SslConfig {
    /// TLS protocol name.
    pub protocol: Option<String>,
    /// Client certificate policy.
    pub client_authentication: Option<ClientAuth>,
    /// Cipher suites to enable.
    pub enabled_cipher_suites: Option<Vec<String>>,
    /// Private key material.
    pub keystore: KeystoreConfig,
    /// Trusted certificates.
    pub truststore: TruststoreConfig,
}

/// The `ssl.keystore` section of a listener.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct KeystoreConfig {
    /// The key-store file. TLS is off for the listener when absent.
    pub file: Option<PathBuf>,
    /// Password of the key-store.
    pub password: Option<String>,
    /// Password of the key inside the key-store.
    pub key_password: Option<String>,
    /// Alias of the key inside the key-store.
    pub key_alias: Option<String>,
    /// Key-store format.
    #[serde(rename = "type")]
    pub store_type: Option<String>,
    /// Key manager algorithm.
    pub algorithm: Option<String>,
}

/// The `ssl.truststore` section of a listener.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TruststoreConfig {
    /// The trust-store file.
    pub file: Option<PathBuf>,
    /// Password of the trust-store.
    pub password: Option<String>,
    /// Trust-store format.
    #[serde(rename = "type")]
    pub store_type: Option<String>,
    /// Trust manager algorithm.
    pub algorithm: Option<String>,
}

/// The `data-connection` section of a listener.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DataConnectionConfig {
    /// Data channel idle timeout in seconds, 0 for none.
    pub idle_timeout: Option<u64>,
    /// Active mode (`PORT`) settings.
    pub active: ActiveConfig,
    /// Passive mode (`PASV`) settings.
    pub passive: PassiveConfig,
}

/// The `data-connection.active` section of a listener.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ActiveConfig {
    /// Whether active mode is allowed.
    pub enabled: Option<bool>,
    /// Local address to connect out from.
    pub local_address: Option<IpAddr>,
    /// Local port to connect out from.
    pub local_port: Option<u16>,
    /// Whether the data connection peer must match the control connection peer.
    pub ip_check: Option<bool>,
}

/// The `data-connection.passive` section of a listener.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PassiveConfig {
    /// Port range such as `2300-2399` or `2300,2310-`.
    pub ports: Option<String>,
    /// Local address to accept passive connections on.
    pub address: Option<IpAddr>,
    /// Address advertised to clients, for servers behind NAT.
    pub external_address: Option<IpAddr>,
}

/// The `blacklist` section of a listener.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BlacklistConfig {
    /// Denied client addresses.
    pub addresses: Vec<IpAddr>,
    /// Denied client networks in CIDR notation.
    pub networks: Vec<String>,
}

/// A `user.<name>` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserConfig {
    /// The password, compared as plain text.
    #[serde(alias = "password")]
    pub user_password: Option<String>,
    /// Home directory. Relative paths are taken from the working directory.
    pub home_directory: Option<PathBuf>,
    /// Whether the account is enabled.
    pub enable_flag: Option<bool>,
    /// Whether the user may write below its home directory.
    pub write_permission: Option<bool>,
    /// Concurrent logins for this user, 0 for unlimited.
    pub max_login_number: Option<u32>,
    /// Concurrent logins for this user from one address, 0 for unlimited.
    pub max_login_per_ip: Option<u32>,
    /// Idle timeout in seconds, 0 for none.
    pub idle_time: Option<u64>,
    /// Upload rate in bytes per second, 0 for unlimited.
    pub upload_rate: Option<u64>,
    /// Download rate in bytes per second, 0 for unlimited.
    pub download_rate: Option<u64>,
}
