use super::UserRecord;
use crate::{
    config::{Declarations, UserConfig},
    error::{ConfigError, ConfigErrorKind},
    options::ANONYMOUS_USER,
};
use async_trait::async_trait;
use std::{
    collections::BTreeMap,
    fmt::{self, Debug, Formatter},
};
use unftp_core::auth::{ADMIN_NAME, AuthenticationError, Authenticator, Credentials, Operation, UnsupportedOperation, UserManager};

/// The read-only set of user accounts, resolved once at startup.
///
/// Answers the lookups and login attempts of the session engine. There is no way to change the
/// set after construction: [`save`](UserDirectory::save) and [`delete`](UserDirectory::delete)
/// always fail and the configuration document has to be changed instead.
///
/// # Example
///
/// ```rust
/// use unftp_autoconf::{auth::UserDirectory, config::ServerConfig};
/// use unftp_core::auth::Credentials;
///
/// let config = ServerConfig::from_json(r#"{"user": {"alice": {"user-password": "pw1"}}}"#).unwrap();
/// let logger = slog::Logger::root(slog::Discard, slog::o!());
/// let users = UserDirectory::resolve(&config.user, logger).unwrap();
///
/// assert!(users.authenticate(&Credentials::named("alice", "pw1")).is_ok());
/// assert!(users.authenticate(&Credentials::named("alice", "wrong")).is_err());
/// ```
pub struct UserDirectory {
    users: BTreeMap<String, UserRecord>,
    logger: slog::Logger,
}

impl UserDirectory {
    /// Resolves the `user` declarations.
    ///
    /// When nothing is declared a single `anonymous` account with default settings is
    /// synthesized. Two declarations with the same name are an error.
    pub fn resolve(declarations: &Declarations<UserConfig>, logger: slog::Logger) -> Result<Self, ConfigError> {
        if declarations.is_empty() {
            slog::debug!(logger, "No users declared, admitting anonymous logins only");
            let anonymous = UserRecord::resolve(ANONYMOUS_USER, &UserConfig::default())?;
            return UserDirectory::from_records([anonymous], logger);
        }
        let records = declarations
            .iter()
            .map(|(name, config)| UserRecord::resolve(name, config))
            .collect::<Result<Vec<_>, _>>()?;
        UserDirectory::from_records(records, logger)
    }

    /// Builds a directory from already resolved records. Two records with the same name are an
    /// error.
    pub fn from_records<I>(records: I, logger: slog::Logger) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = UserRecord>,
    {
        let mut users = BTreeMap::new();
        for record in records {
            let name = record.name().to_string();
            if users.insert(name.clone(), record).is_some() {
                return Err(ConfigErrorKind::DuplicateUser(name).into());
            }
        }
        Ok(UserDirectory { users, logger })
    }

    /// Finds the user with exactly this name. There is no case folding or trimming.
    pub fn lookup_by_name(&self, name: &str) -> Option<&UserRecord> {
        self.users.get(name)
    }

    /// All user names.
    pub fn list_names(&self) -> Vec<String> {
        self.users.keys().cloned().collect()
    }

    /// True if a user with exactly this name exists.
    pub fn exists(&self, name: &str) -> bool {
        self.users.contains_key(name)
    }

    /// All user records, ordered by name.
    pub fn all_users(&self) -> impl Iterator<Item = &UserRecord> {
        self.users.values()
    }

    /// The number of accounts.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// True if there are no accounts. Never the case for a resolved directory.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Checks the credentials of a login attempt.
    ///
    /// * Named credentials succeed if the user exists and the password is exactly the configured
    ///   one. Passwords are compared as configured plain text.
    /// * Anonymous credentials succeed if an `anonymous` account exists.
    /// * Certificate credentials are not handled by this directory and are reported as
    ///   [`AuthenticationError::UnsupportedCredentialKind`].
    pub fn authenticate(&self, creds: &Credentials) -> Result<UserRecord, AuthenticationError> {
        match creds {
            Credentials::Named { username, password } => self
                .users
                .get(username.as_str())
                .filter(|user| user.password_matches(password))
                .cloned()
                .ok_or(AuthenticationError::InvalidCredentials),
            Credentials::Anonymous => self.users.get(ANONYMOUS_USER).cloned().ok_or(AuthenticationError::AnonymousNotConfigured),
            Credentials::Certificate { username, .. } => {
                slog::error!(self.logger, "Authentication attempted with a credential kind the user directory does not support"; "username" => username, "kind" => "certificate");
                Err(AuthenticationError::UnsupportedCredentialKind)
            }
        }
    }

    /// The administrator name, `admin`.
    pub fn admin_name(&self) -> &'static str {
        ADMIN_NAME
    }

    /// True if `name` is exactly `admin`.
    ///
    /// This compares names only: an `admin` account does not need to exist for this to be true,
    /// and an account that does exist gains nothing from it.
    pub fn is_administrator(&self, name: &str) -> bool {
        name == ADMIN_NAME
    }

    /// Always fails, the directory is read-only.
    pub fn save(&self, _user: &UserRecord) -> Result<(), UnsupportedOperation> {
        Err(UnsupportedOperation::new(
            Operation::Save,
            "users cannot be added at runtime, declare them in the server configuration",
        ))
    }

    /// Always fails, the directory is read-only.
    pub fn delete(&self, _name: &str) -> Result<(), UnsupportedOperation> {
        Err(UnsupportedOperation::new(
            Operation::Delete,
            "users cannot be removed at runtime, remove them from the server configuration",
        ))
    }
}

impl Debug for UserDirectory {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserDirectory").field("users", &self.users.values().collect::<Vec<_>>()).finish()
    }
}

impl PartialEq for UserDirectory {
    fn eq(&self, other: &Self) -> bool {
        self.users == other.users
    }
}

impl Eq for UserDirectory {}

impl UserManager<UserRecord> for UserDirectory {
    fn user_by_name(&self, name: &str) -> Option<&UserRecord> {
        self.lookup_by_name(name)
    }

    fn all_user_names(&self) -> Vec<String> {
        self.list_names()
    }

    fn does_exist(&self, name: &str) -> bool {
        self.exists(name)
    }

    fn is_admin(&self, name: &str) -> bool {
        self.is_administrator(name)
    }

    fn save(&self, user: &UserRecord) -> Result<(), UnsupportedOperation> {
        UserDirectory::save(self, user)
    }

    fn delete(&self, name: &str) -> Result<(), UnsupportedOperation> {
        UserDirectory::delete(self, name)
    }
}

#[async_trait]
impl Authenticator<UserRecord> for UserDirectory {
    #[tracing_attributes::instrument(skip(self, creds))]
    async fn authenticate(&self, creds: &Credentials) -> Result<UserRecord, AuthenticationError> {
        UserDirectory::authenticate(self, creds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use unftp_core::auth::ClientCert;

    fn logger() -> slog::Logger {
        slog::Logger::root(slog::Discard, slog::o!())
    }

    fn directory(json: &str) -> UserDirectory {
        let decls: Declarations<UserConfig> = serde_json::from_str(json).unwrap();
        UserDirectory::resolve(&decls, logger()).unwrap()
    }

    #[test]
    fn synthesizes_anonymous_account() {
        let users = UserDirectory::resolve(&Declarations::new(), logger()).unwrap();
        assert_eq!(users.list_names(), vec!["anonymous".to_string()]);
        let anonymous = users.authenticate(&Credentials::Anonymous).unwrap();
        assert_eq!(anonymous.name(), "anonymous");
        assert!(!anonymous.has_password());
        assert!(!anonymous.is_writable());
        assert_eq!(Some(&anonymous), users.lookup_by_name("anonymous"));
    }

    #[test]
    fn named_authentication() {
        let users = directory(r#"{"alice": {"user-password": "pw1"}}"#);
        let alice = users.authenticate(&Credentials::named("alice", "pw1")).unwrap();
        assert_eq!(alice.name(), "alice");
        assert_eq!(users.authenticate(&Credentials::named("alice", "wrong")), Err(AuthenticationError::InvalidCredentials));
        assert_eq!(users.authenticate(&Credentials::named("nobody", "x")), Err(AuthenticationError::InvalidCredentials));
        assert_eq!(users.authenticate(&Credentials::named("Alice", "pw1")), Err(AuthenticationError::InvalidCredentials));
    }

    #[test]
    fn anonymous_needs_an_anonymous_account() {
        let users = directory(r#"{"alice": {"user-password": "pw1"}}"#);
        assert_eq!(users.authenticate(&Credentials::Anonymous), Err(AuthenticationError::AnonymousNotConfigured));

        let users = directory(r#"{"alice": {"user-password": "pw1"}, "anonymous": {"user-password": "ignored"}}"#);
        assert_eq!(users.authenticate(&Credentials::Anonymous).unwrap().name(), "anonymous");
    }

    #[test]
    fn certificates_are_a_contract_violation() {
        let users = directory(r#"{"alice": {"user-password": "pw1"}}"#);
        let err = users
            .authenticate(&Credentials::Certificate {
                username: "alice".to_string(),
                chain: vec![ClientCert(vec![1, 2, 3])],
            })
            .unwrap_err();
        assert_eq!(err, AuthenticationError::UnsupportedCredentialKind);
        assert!(err.is_contract_violation());
    }

    #[test]
    fn rejects_duplicate_user_names() {
        let decls: Declarations<UserConfig> = serde_json::from_str(r#"[{"name": "bob"}, {"name": "bob", "user-password": "x"}]"#).unwrap();
        let err = UserDirectory::resolve(&decls, logger()).unwrap_err();
        assert_eq!(err.kind(), &ConfigErrorKind::DuplicateUser("bob".to_string()));
    }

    #[test]
    fn names_are_case_sensitive() {
        let users = directory(r#"{"bob": {}, "Bob": {}}"#);
        let mut names = users.list_names();
        names.sort();
        assert_eq!(names, vec!["Bob".to_string(), "bob".to_string()]);
        assert!(users.exists("bob"));
        assert!(users.exists("Bob"));
        assert!(!users.exists("BOB"));
        assert_eq!(users.lookup_by_name(" bob"), None);
    }

    #[test]
    fn administrator_is_a_name_comparison() {
        let users = directory(r#"{"alice": {"user-password": "pw1"}}"#);
        assert!(users.is_administrator("admin"));
        assert!(!users.exists("admin"));
        assert!(!users.is_administrator("alice"));
        assert!(!users.is_administrator("Admin"));
        assert_eq!(users.admin_name(), "admin");
    }

    #[test]
    fn mutations_are_rejected() {
        let users = directory(r#"{"alice": {"user-password": "pw1"}, "bob": {}}"#);
        let before = users.list_names();
        let alice = users.lookup_by_name("alice").unwrap().clone();

        assert_eq!(users.save(&alice).unwrap_err().operation(), Operation::Save);
        assert_eq!(users.delete("alice").unwrap_err().operation(), Operation::Delete);
        assert_eq!(users.delete("nobody").unwrap_err().operation(), Operation::Delete);
        assert_eq!(UserManager::save(&users, &alice).unwrap_err().operation(), Operation::Save);
        assert_eq!(UserManager::delete(&users, "bob").unwrap_err().operation(), Operation::Delete);
        assert_eq!(users.list_names(), before);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn authenticates_through_the_trait() {
        let users: Arc<dyn Authenticator<UserRecord>> = Arc::new(directory(r#"{"alice": {"user-password": "pw1"}}"#));
        assert_eq!(users.authenticate(&Credentials::named("alice", "pw1")).await.unwrap().name(), "alice");
        assert_eq!(users.authenticate(&Credentials::Anonymous).await, Err(AuthenticationError::AnonymousNotConfigured));
    }
}
