//! Signed bearer tokens.
//!
//! A token is `base64url(claims).base64url(hmac_sha256(key, base64url(claims)))`.
//! Claims carry the user id, role and expiry; the role is informational and is
//! re-read from the database on every request.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use yadukul_core::{Role, UserId};

type HmacSha256 = Hmac<Sha256>;

/// Errors from issuing or verifying a token.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Not two base64url segments separated by a dot.
    #[error("malformed token")]
    Malformed,

    /// Signature does not match the payload.
    #[error("bad signature")]
    BadSignature,

    /// Past its expiry.
    #[error("token expired")]
    Expired,

    /// Claims could not be encoded or decoded.
    #[error("invalid claims: {0}")]
    Claims(#[from] serde_json::Error),

    /// The signing key was rejected by the MAC.
    #[error("invalid signing key")]
    InvalidKey,
}

/// What a token asserts about its bearer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: UserId,
    pub role: Role,
    /// Expiry as seconds since the Unix epoch.
    pub exp: i64,
}

/// Issues and verifies bearer tokens with one HMAC key.
#[derive(Clone)]
pub struct TokenSigner {
    key: SecretString,
    ttl: Duration,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("key", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenSigner {
    /// Create a signer whose tokens live for `ttl_days`.
    #[must_use]
    pub fn new(key: SecretString, ttl_days: u32) -> Self {
        Self {
            key,
            ttl: Duration::days(i64::from(ttl_days)),
        }
    }

    /// Issue a token for a user.
    ///
    /// # Errors
    ///
    /// Returns `TokenError` if the claims cannot be encoded.
    pub fn issue(&self, user_id: UserId, role: Role) -> Result<String, TokenError> {
        self.issue_at(user_id, role, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// Returns `TokenError` if the claims cannot be encoded.
    pub fn issue_at(
        &self,
        user_id: UserId,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user_id,
            role,
            exp: (now + self.ttl).timestamp(),
        };
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);
        let signature = URL_SAFE_NO_PAD.encode(self.mac(&payload)?.finalize().into_bytes());
        Ok(format!("{payload}.{signature}"))
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError` if the token is malformed, the signature does not
    /// match, or the token has expired.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// See [`TokenSigner::verify`].
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let (payload, signature) = token.split_once('.').ok_or(TokenError::Malformed)?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| TokenError::Malformed)?;

        // Constant-time comparison
        self.mac(payload)?
            .verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let claims: Claims = serde_json::from_slice(
            &URL_SAFE_NO_PAD
                .decode(payload)
                .map_err(|_| TokenError::Malformed)?,
        )?;

        if claims.exp <= now.timestamp() {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }

    fn mac(&self, payload: &str) -> Result<HmacSha256, TokenError> {
        let mut mac = HmacSha256::new_from_slice(self.key.expose_secret().as_bytes())
            .map_err(|_| TokenError::InvalidKey)?;
        mac.update(payload.as_bytes());
        Ok(mac)
    }
}
