//! Authentication extractors.
//!
//! Every protected handler names the role it needs in its signature:
//!
//! ```rust,ignore
//! async fn delete_product(
//!     RequireAdmin(admin): RequireAdmin,
//!     State(state): State<AppState>,
//! ) -> Result<Json<Message>> { ... }
//! ```
//!
//! The bearer token is verified first, then the user is loaded from the
//! database so a deleted user or a changed role takes effect immediately.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::debug;

use yadukul_core::Role;

use crate::db::UserRepository;
use crate::error::{AppError, set_sentry_user};
use crate::models::user::User;
use crate::state::AppState;

const NO_TOKEN: &str = "Not authorized, no token";
const TOKEN_FAILED: &str = "Not authorized, token failed";

/// Extractor for any authenticated user.
pub struct RequireUser(pub User);

/// Extractor for admins.
pub struct RequireAdmin(pub User);

/// Extractor for staff members. Admins pass as well.
pub struct RequireStaff(pub User);

/// Extractor for customers.
pub struct RequireCustomer(pub User);

/// Pull the token out of an `Authorization: Bearer <token>` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

async fn authenticate(parts: &Parts, state: &AppState) -> Result<User, AppError> {
    let token = bearer_token(parts).ok_or_else(|| AppError::Unauthorized(NO_TOKEN.to_owned()))?;

    let claims = state.tokens().verify(token).map_err(|e| {
        debug!(error = %e, "Rejected bearer token");
        AppError::Unauthorized(TOKEN_FAILED.to_owned())
    })?;

    let user = UserRepository::new(state.pool())
        .get_by_id(claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized(TOKEN_FAILED.to_owned()))?;

    set_sentry_user(&user.id, &user.role.to_string());
    Ok(user)
}

fn require_role(user: User, allowed: &[Role], message: &str) -> Result<User, AppError> {
    if allowed.contains(&user.role) {
        Ok(user)
    } else {
        Err(AppError::Forbidden(message.to_owned()))
    }
}

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state).await.map(Self)
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = authenticate(parts, state).await?;
        require_role(user, &[Role::Admin], "Not authorized as an admin").map(Self)
    }
}

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = authenticate(parts, state).await?;
        require_role(user, &[Role::Staff, Role::Admin], "Not authorized as staff").map(Self)
    }
}

impl FromRequestParts<AppState> for RequireCustomer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = authenticate(parts, state).await?;
        require_role(user, &[Role::Customer], "Not authorized as a customer").map(Self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::Request;
    use chrono::Utc;

    use yadukul_core::{Phone, UserId};

    use super::*;

    fn parts(authorization: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/users/profile");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    fn user(role: Role) -> User {
        User {
            id: UserId::new(1),
            name: role.default_name().to_owned(),
            phone: Phone::parse("9876543210").unwrap(),
            role,
            address: None,
            avatar_url: None,
            loyalty_points: 0,
            assigned_area: None,
            performance: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&parts(Some("Bearer abc.def"))), Some("abc.def"));
        assert_eq!(bearer_token(&parts(Some("bearer abc.def"))), Some("abc.def"));
        assert_eq!(bearer_token(&parts(Some("Basic dXNlcg=="))), None);
        assert_eq!(bearer_token(&parts(Some("Bearer "))), None);
        assert_eq!(bearer_token(&parts(None)), None);
    }

    #[test]
    fn test_require_role() {
        assert!(require_role(user(Role::Admin), &[Role::Admin], "no").is_ok());
        assert!(require_role(user(Role::Admin), &[Role::Staff, Role::Admin], "no").is_ok());

        let err = require_role(user(Role::Customer), &[Role::Admin], "Not authorized as an admin")
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(ref m) if m == "Not authorized as an admin"));
    }
}
