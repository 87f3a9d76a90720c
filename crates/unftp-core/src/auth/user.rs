use std::{
    fmt::{Debug, Display},
    path::Path,
};

/// Defines the requirements for holders of user detail
pub trait UserDetail: Send + Sync + Display + Debug {
    /// The name the user logs in with.
    fn username(&self) -> &str;

    /// Tells if this user account is enabled. Defaults to true.
    fn account_enabled(&self) -> bool {
        true
    }

    /// Returns the user's home directory, if any.
    fn home(&self) -> Option<&Path> {
        None
    }
}
