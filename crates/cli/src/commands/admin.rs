//! Admin user bootstrap.
//!
//! Login creates customers and staff on demand, but the first admin has to
//! exist before anyone can manage the shop. An existing account with the same
//! phone is promoted.

use yadukul_core::{Phone, UserId};
use yadukul_storefront::db::UserRepository;

use super::CommandError;

/// Create an admin user, or promote the user that owns `phone`.
///
/// # Errors
///
/// Returns `CommandError::Invalid` for a malformed phone or blank name, and
/// database errors otherwise.
pub async fn create(phone: &str, name: &str) -> Result<UserId, CommandError> {
    let phone = Phone::parse(phone).map_err(|e| CommandError::Invalid(e.to_string()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(CommandError::Invalid("name is required".to_owned()));
    }

    let pool = super::connect().await?;

    tracing::info!("Creating admin user: {} ({})", name, phone.masked());
    let user = UserRepository::new(&pool).upsert_admin(name, &phone).await?;

    tracing::info!(
        "Admin user ready! ID: {}, Name: {}, Phone: {}",
        user.id,
        user.name,
        user.phone.masked()
    );
    tracing::info!("Log in with this phone number and the configured OTP code.");

    Ok(user.id)
}
