use crate::{
    config::UserConfig,
    error::{ConfigError, ConfigErrorKind},
    options::{DEFAULT_HOME_DIRECTORY, DEFAULT_IDLE_TIMEOUT, DEFAULT_TRANSFER_RATE},
};
use std::{
    fmt::{self, Debug, Display, Formatter},
    path::{Component, Path, PathBuf},
    time::Duration,
};
use unftp_core::auth::UserDetail;

/// A resolved user account.
///
/// Limits of 0 mean unlimited, for the login counts as well as for the transfer rates.
#[derive(Clone, PartialEq, Eq)]
pub struct UserRecord {
    name: String,
    password: Option<String>,
    home: PathBuf,
    enabled: bool,
    idle_timeout: Duration,
    writable: bool,
    max_concurrent_logins: u32,
    max_logins_per_ip: u32,
    upload_rate: u64,
    download_rate: u64,
}

impl UserRecord {
    /// Resolves a `user.<name>` declaration.
    ///
    /// A relative home directory is made absolute against the working directory.
    pub fn resolve(name: &str, config: &UserConfig) -> Result<UserRecord, ConfigError> {
        let home = config.home_directory.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_HOME_DIRECTORY));
        let home = std::path::absolute(&home)
            .map(|home| normalize(&home))
            .map_err(|e| ConfigError::new(ConfigErrorKind::InvalidHomeDirectory(name.to_string()), e))?;
        Ok(UserRecord {
            name: name.to_string(),
            password: config.user_password.clone(),
            home,
            enabled: config.enable_flag.unwrap_or(true),
            idle_timeout: config.idle_time.map(Duration::from_secs).unwrap_or(DEFAULT_IDLE_TIMEOUT),
            writable: config.write_permission.unwrap_or(false),
            max_concurrent_logins: config.max_login_number.unwrap_or(0),
            max_logins_per_ip: config.max_login_per_ip.unwrap_or(0),
            upload_rate: config.upload_rate.unwrap_or(DEFAULT_TRANSFER_RATE),
            download_rate: config.download_rate.unwrap_or(DEFAULT_TRANSFER_RATE),
        })
    }

    /// The login name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True if the account has a password. Accounts without one cannot log in with a name and
    /// password, only as the anonymous account.
    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }

    /// Compares the given password with the configured one, exactly.
    pub fn password_matches(&self, password: &str) -> bool {
        self.password.as_deref() == Some(password)
    }

    /// The absolute home directory.
    pub fn home_directory(&self) -> &Path {
        &self.home
    }

    /// Whether the account is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Session idle timeout. Zero means the session never idles out.
    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// Whether the user may write below its home directory.
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Maximum concurrent logins, 0 for unlimited.
    pub fn max_concurrent_logins(&self) -> u32 {
        self.max_concurrent_logins
    }

    /// Maximum concurrent logins from one address, 0 for unlimited.
    pub fn max_logins_per_ip(&self) -> u32 {
        self.max_logins_per_ip
    }

    /// Upload limit in bytes per second, `None` if unlimited.
    pub fn upload_rate_limit(&self) -> Option<u64> {
        Some(self.upload_rate).filter(|rate| *rate > 0)
    }

    /// Download limit in bytes per second, `None` if unlimited.
    pub fn download_rate_limit(&self) -> Option<u64> {
        Some(self.download_rate).filter(|rate| *rate > 0)
    }

    /// Tells if the user may write to `path`.
    ///
    /// Write permission is always rooted at the user's own home directory. Relative paths are
    /// taken from the home directory and paths climbing out through `..` are refused.
    pub fn can_write(&self, path: &Path) -> bool {
        if !self.writable || path.components().any(|c| c == Component::ParentDir) {
            return false;
        }
        let path = self.home.join(path);
        path.starts_with(&self.home)
    }

    /// Tells if another session may be opened given the sessions this user already has open in
    /// total and from the connecting address.
    pub fn can_login(&self, open_sessions: u32, open_sessions_from_ip: u32) -> bool {
        let below = |limit: u32, current: u32| limit == 0 || current < limit;
        below(self.max_concurrent_logins, open_sessions) && below(self.max_logins_per_ip, open_sessions_from_ip)
    }
}

// Folds `.` and `..` lexically. `..` at the root stays at the root.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

impl UserDetail for UserRecord {
    fn username(&self) -> &str {
        &self.name
    }

    fn account_enabled(&self) -> bool {
        self.enabled
    }

    fn home(&self) -> Option<&Path> {
        Some(&self.home)
    }
}

impl Display for UserRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Debug for UserRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("name", &self.name)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("home", &self.home)
            .field("enabled", &self.enabled)
            .field("idle_timeout", &self.idle_timeout)
            .field("writable", &self.writable)
            .field("max_concurrent_logins", &self.max_concurrent_logins)
            .field("max_logins_per_ip", &self.max_logins_per_ip)
            .field("upload_rate", &self.upload_rate)
            .field("download_rate", &self.download_rate)
            .finish()
    }
}
