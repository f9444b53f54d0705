//! Authentication service.
//!
//! Login is a phone number plus a one-time code. Code delivery is simulated:
//! every login accepts the configured fixed code, and "sending" it only logs.

mod error;
pub mod token;

pub use error::AuthError;
pub use token::{Claims, TokenError, TokenSigner};

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use tracing::info;

use yadukul_core::{Phone, Role};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::user::User;

/// Authentication service.
///
/// Handles OTP requests and login, creating users on first login.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    otp_code: &'a SecretString,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, otp_code: &'a SecretString) -> Self {
        Self {
            users: UserRepository::new(pool),
            otp_code,
        }
    }

    /// "Send" a one-time code to a phone.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidPhone` if the phone number is malformed.
    pub fn request_otp(phone: &str) -> Result<Phone, AuthError> {
        let phone = Phone::parse(phone)?;
        info!(phone = %phone.masked(), "OTP issued (simulated delivery)");
        Ok(phone)
    }

    /// Log in with a phone, role and one-time code.
    ///
    /// A phone seen for the first time becomes a new user with the role's
    /// default name.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidOtp` if the code is wrong.
    /// Returns `AuthError::InvalidPhone` if the phone number is malformed.
    /// Returns `AuthError::RoleMismatch` if the phone belongs to another role.
    pub async fn login(&self, phone: &str, role: Role, otp: &str) -> Result<User, AuthError> {
        if !otp_matches(otp.trim(), self.otp_code.expose_secret()) {
            return Err(AuthError::InvalidOtp);
        }

        let phone = Phone::parse(phone)?;

        if let Some(user) = self.users.get_by_phone(&phone).await? {
            return Self::check_role(user, role);
        }

        match self.users.create(role.default_name(), &phone, role).await {
            Ok(user) => {
                info!(user_id = %user.id, role = %role, "Created user on first login");
                Ok(user)
            }
            // Lost a race with a concurrent first login for the same phone
            Err(RepositoryError::Conflict(_)) => {
                let user = self
                    .users
                    .get_by_phone(&phone)
                    .await?
                    .ok_or(RepositoryError::NotFound)?;
                Self::check_role(user, role)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn check_role(user: User, role: Role) -> Result<User, AuthError> {
        if user.role == role {
            Ok(user)
        } else {
            Err(AuthError::RoleMismatch(user.role))
        }
    }
}

/// Constant-time string comparison to prevent timing attacks.
fn otp_matches(given: &str, expected: &str) -> bool {
    if given.len() != expected.len() {
        return false;
    }
    given
        .bytes()
        .zip(expected.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_matches() {
        assert!(otp_matches("123456", "123456"));
        assert!(!otp_matches("123457", "123456"));
        assert!(!otp_matches("12345", "123456"));
        assert!(!otp_matches("", "123456"));
    }
}
