//! Core traits and types shared between the unftp configuration core and an FTP session engine.
//!
//! The session engine depends on this crate only. It receives something implementing
//! [`Authenticator`](auth::Authenticator) and [`UserManager`](auth::UserManager) at startup and
//! consults it for every login attempt.

pub mod auth;
