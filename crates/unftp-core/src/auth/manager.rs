//! Read access to a set of user accounts.

use super::UserDetail;
use derive_more::Display;
use std::fmt::Debug;
use thiserror::Error;

/// The administrator name. Whether a name is the administrator is decided by comparing against
/// this literal, independent of the accounts a [`UserManager`] actually holds.
pub const ADMIN_NAME: &str = "admin";

/// Lookup of user accounts by name.
///
/// Implementations may be backed by a read-only source in which case [`save`](UserManager::save)
/// and [`delete`](UserManager::delete) return [`UnsupportedOperation`].
pub trait UserManager<User>: Sync + Send + Debug
where
    User: UserDetail,
{
    /// Finds the user with exactly this name. Names are case-sensitive.
    fn user_by_name(&self, name: &str) -> Option<&User>;

    /// All distinct user names.
    fn all_user_names(&self) -> Vec<String>;

    /// True if a user with exactly this name exists.
    fn does_exist(&self, name: &str) -> bool {
        self.user_by_name(name).is_some()
    }

    /// The name of the administrator account.
    fn admin_name(&self) -> &str {
        ADMIN_NAME
    }

    /// True if `name` is the administrator name. The account need not exist.
    fn is_admin(&self, name: &str) -> bool {
        name == ADMIN_NAME
    }

    /// Stores a user account.
    fn save(&self, user: &User) -> Result<(), UnsupportedOperation>;

    /// Removes the user account with this name.
    fn delete(&self, name: &str) -> Result<(), UnsupportedOperation>;
}

/// A mutation of the user set.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Display)]
pub enum Operation {
    /// Adding or updating a user.
    #[display("save")]
    Save,
    /// Removing a user.
    #[display("delete")]
    Delete,
}

/// Returned when a [`UserManager`] cannot perform a mutation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported operation '{operation}': {hint}")]
pub struct UnsupportedOperation {
    operation: Operation,
    hint: String,
}

impl UnsupportedOperation {
    /// Creates a new error for the given operation with a hint for the operator.
    pub fn new(operation: Operation, hint: impl Into<String>) -> Self {
        UnsupportedOperation { operation, hint: hint.into() }
    }

    /// The operation that was refused.
    pub fn operation(&self) -> Operation {
        self.operation
    }
}
