//! Authentication error types.

use thiserror::Error;

use yadukul_core::{PhoneError, Role};

use super::token::TokenError;
use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid phone number format.
    #[error("invalid phone: {0}")]
    InvalidPhone(#[from] PhoneError),

    /// The one-time code did not match.
    #[error("invalid otp")]
    InvalidOtp,

    /// The phone is registered under a different role.
    #[error("phone registered as {0}")]
    RoleMismatch(Role),

    /// Bearer token could not be issued or verified.
    #[error("token error: {0}")]
    Token(#[from] TokenError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
