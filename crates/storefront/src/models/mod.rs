//! Domain models for the dairy storefront.
//!
//! Domain types serialize to the JSON shape the panel client reads: camelCase
//! fields and the record id under `_id`. Request bodies are separate `*Input`
//! types that are validated before they reach a repository.

pub mod conversion;
pub mod dashboard;
pub mod delivery;
pub mod gallery;
pub mod inventory;
pub mod order;
pub mod product;
pub mod settings;
pub mod subscription;
pub mod user;

use thiserror::Error;

/// A request body that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Trim a required text field, rejecting blank values.
pub(crate) fn require_text(field: &str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError(format!("{field} is required")));
    }
    Ok(trimmed.to_owned())
}

/// Trim an optional text field; blank becomes `None`.
pub(crate) fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("name", "  Ghee ").unwrap(), "Ghee");
        assert_eq!(
            require_text("name", "   "),
            Err(ValidationError::new("name is required"))
        );
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text(Some(" Sector 5 ")), Some("Sector 5".to_owned()));
        assert_eq!(optional_text(Some("")), None);
        assert_eq!(optional_text(None), None);
    }
}
