//! The user accounts of the server: resolution of the `user` declarations and the
//! [`UserDirectory`] the session engine authenticates against.
//!
//! The directory implements the [`Authenticator`](unftp_core::auth::Authenticator) and
//! [`UserManager`](unftp_core::auth::UserManager) traits from `unftp-core`.

mod directory;
pub use directory::UserDirectory;

mod user;
pub use user::UserRecord;

pub use unftp_core::auth::{ADMIN_NAME, AuthenticationError, Credentials, UnsupportedOperation};
