//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `YADUKUL_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `YADUKUL_TOKEN_SECRET` - Bearer token signing secret (min 32 chars, high entropy)
//!
//! ## Optional
//! - `YADUKUL_HOST` - Bind address (default: 127.0.0.1)
//! - `YADUKUL_PORT` - Listen port (default: 5000)
//! - `YADUKUL_OTP_CODE` - Fixed one-time code accepted at login (default: 123456)
//! - `YADUKUL_TOKEN_TTL_DAYS` - Bearer token lifetime in days (default: 30)
//! - `YADUKUL_UPLOAD_DIR` - Directory uploaded images are written to (default: uploads)
//! - `YADUKUL_UPLOAD_MAX_BYTES` - Largest accepted upload (default: 5 MiB)
//! - `YADUKUL_PUBLIC_URL` - Prefix for returned upload URLs (default: relative URLs)
//! - `YADUKUL_AUTH_RATE_REPLENISH_SECS` - Seconds per replenished OTP/login attempt (default: 6)
//! - `YADUKUL_AUTH_RATE_BURST` - OTP/login attempts allowed in a burst (default: 5)
//! - `YADUKUL_CORS_ORIGIN` - Origin of the panel client, if served from elsewhere
//! - `YADUKUL_LOG_JSON` - Emit JSON logs when set
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const DATABASE_URL_ENV: &str = "YADUKUL_DATABASE_URL";
const MIN_TOKEN_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_UPLOAD_MAX_BYTES: usize = 5 * 1024 * 1024;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Bearer token settings
    pub auth: AuthConfig,
    /// Image upload settings
    pub upload: UploadConfig,
    /// OTP/login rate limit
    pub rate_limit: RateLimitConfig,
    /// Allowed CORS origin for the panel client
    pub cors_origin: Option<String>,
    /// Emit JSON-formatted logs
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Authentication configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC key for bearer tokens
    pub token_secret: SecretString,
    /// Bearer token lifetime in days
    pub token_ttl_days: u32,
    /// The one-time code every login must present
    pub otp_code: SecretString,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &"[REDACTED]")
            .field("token_ttl_days", &self.token_ttl_days)
            .field("otp_code", &"[REDACTED]")
            .finish()
    }
}

/// Image upload configuration.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Directory uploaded files are written to and served from
    pub dir: PathBuf,
    /// Largest accepted file in bytes
    pub max_bytes: usize,
    /// Absolute URL prefix for returned links (empty for relative links)
    pub public_url: String,
}

/// Rate limit for the OTP and login endpoints, per client IP.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Seconds to replenish one attempt
    pub auth_replenish_secs: u64,
    /// Attempts available at once
    pub auth_burst: u32,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url(DATABASE_URL_ENV)?;
        let host: IpAddr = get_parsed_env("YADUKUL_HOST", "127.0.0.1")?;
        let port: u16 = get_parsed_env("YADUKUL_PORT", "5000")?;

        let auth = AuthConfig::from_env()?;
        let upload = UploadConfig::from_env()?;
        let rate_limit = RateLimitConfig::from_env()?;

        Ok(Self {
            database_url,
            host,
            port,
            auth,
            upload,
            rate_limit,
            cors_origin: get_optional_env("YADUKUL_CORS_ORIGIN"),
            log_json: get_optional_env("YADUKUL_LOG_JSON").is_some(),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: get_parsed_env("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: get_parsed_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl AuthConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let token_secret = get_validated_secret("YADUKUL_TOKEN_SECRET")?;
        validate_secret_length(&token_secret, "YADUKUL_TOKEN_SECRET")?;

        let token_ttl_days: u32 = get_parsed_env("YADUKUL_TOKEN_TTL_DAYS", "30")?;
        if token_ttl_days == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "YADUKUL_TOKEN_TTL_DAYS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let otp_code = get_env_or_default("YADUKUL_OTP_CODE", "123456");
        if otp_code.is_empty() || !otp_code.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::InvalidEnvVar(
                "YADUKUL_OTP_CODE".to_string(),
                "must be a non-empty string of digits".to_string(),
            ));
        }

        Ok(Self {
            token_secret,
            token_ttl_days,
            otp_code: SecretString::from(otp_code),
        })
    }
}

impl UploadConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let public_url = parse_public_url(&get_env_or_default("YADUKUL_PUBLIC_URL", ""))?;

        Ok(Self {
            dir: PathBuf::from(get_env_or_default("YADUKUL_UPLOAD_DIR", "uploads")),
            max_bytes: get_parsed_env(
                "YADUKUL_UPLOAD_MAX_BYTES",
                &DEFAULT_UPLOAD_MAX_BYTES.to_string(),
            )?,
            public_url,
        })
    }
}

/// Check an absolute public URL prefix and strip its trailing slash. Empty
/// means upload URLs stay relative.
fn parse_public_url(raw: &str) -> Result<String, ConfigError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(String::new());
    }
    url::Url::parse(raw).map_err(|e| {
        ConfigError::InvalidEnvVar("YADUKUL_PUBLIC_URL".to_string(), e.to_string())
    })?;
    Ok(raw.trim_end_matches('/').to_string())
}

impl RateLimitConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let auth_replenish_secs: u64 = get_parsed_env("YADUKUL_AUTH_RATE_REPLENISH_SECS", "6")?;
        let auth_burst: u32 = get_parsed_env("YADUKUL_AUTH_RATE_BURST", "5")?;

        if auth_replenish_secs == 0 || auth_burst == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "YADUKUL_AUTH_RATE_*".to_string(),
                "rate limit values must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            auth_replenish_secs,
            auth_burst,
        })
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            auth_replenish_secs: 6,
            auth_burst: 5,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to the generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Load only the database URL, for tools that do not serve HTTP.
///
/// # Errors
///
/// Returns `ConfigError::MissingEnvVar` if neither `YADUKUL_DATABASE_URL` nor
/// `DATABASE_URL` is set.
pub fn database_url_from_env() -> Result<SecretString, ConfigError> {
    let _ = dotenvy::dotenv();
    get_database_url(DATABASE_URL_ENV)
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn get_parsed_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Validate that a signing secret meets minimum length requirements.
fn validate_secret_length(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_TOKEN_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_TOKEN_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real secrets like API keys have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

/// Configuration for unit tests; nothing here is read from the environment.
#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        database_url: SecretString::from("postgres://localhost/test"),
        host: "127.0.0.1".parse().unwrap(),
        port: 5000,
        auth: AuthConfig {
            token_secret: SecretString::from("zP4!qW8@mN2#vB6$xC0%kL3^hJ7&gF1*"),
            token_ttl_days: 30,
            otp_code: SecretString::from("123456"),
        },
        upload: UploadConfig {
            dir: PathBuf::from("uploads"),
            max_bytes: DEFAULT_UPLOAD_MAX_BYTES,
            public_url: String::new(),
        },
        rate_limit: RateLimitConfig::default(),
        cors_origin: None,
        log_json: false,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}
