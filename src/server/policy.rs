use crate::{
    config::ServerSection,
    options::{DEFAULT_ANON_ENABLED, DEFAULT_LOGIN_FAILURE_DELAY, DEFAULT_MAX_ANON_LOGINS, DEFAULT_MAX_LOGINS, DEFAULT_MAX_LOGIN_FAILURES},
};
use std::time::Duration;

/// Process wide connection limits.
///
/// The session engine enforces these. In particular it applies the login failure delay and
/// closes the session after `max_login_failures` failed attempts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerPolicy {
    /// Worker threads for the session engine.
    pub max_threads: u32,
    /// Concurrent logins over all users.
    pub max_logins: u32,
    /// Concurrent anonymous logins.
    pub max_anon_logins: u32,
    /// Whether anonymous logins are admitted.
    pub anon_login_enabled: bool,
    /// Failed logins before the session is closed.
    pub max_login_failures: u32,
    /// Delay after a failed login.
    pub login_failure_delay: Duration,
}

impl Default for ServerPolicy {
    fn default() -> Self {
        ServerPolicy {
            max_threads: available_threads(),
            max_logins: DEFAULT_MAX_LOGINS,
            max_anon_logins: DEFAULT_MAX_ANON_LOGINS,
            anon_login_enabled: DEFAULT_ANON_ENABLED,
            max_login_failures: DEFAULT_MAX_LOGIN_FAILURES,
            login_failure_delay: DEFAULT_LOGIN_FAILURE_DELAY,
        }
    }
}

impl ServerPolicy {
    /// Resolves the `server` section.
    pub fn resolve(section: &ServerSection) -> ServerPolicy {
        let defaults = ServerPolicy::default();
        ServerPolicy {
            max_threads: section.max_threads.unwrap_or(defaults.max_threads),
            max_logins: section.max_logins.unwrap_or(defaults.max_logins),
            max_anon_logins: section.max_anon_logins.unwrap_or(defaults.max_anon_logins),
            anon_login_enabled: section.anon_enabled.unwrap_or(defaults.anon_login_enabled),
            max_login_failures: section.max_login_failures.unwrap_or(defaults.max_login_failures),
            login_failure_delay: section.login_failure_delay.map(Duration::from_millis).unwrap_or(defaults.login_failure_delay),
        }
    }
}

fn available_threads() -> u32 {
    std::thread::available_parallelism()
        .map(|n| u32::try_from(n.get()).unwrap_or(u32::MAX))
        .unwrap_or(1)
}
