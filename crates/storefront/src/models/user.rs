//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use yadukul_core::{Phone, Role, UserId};

use super::{ValidationError, optional_text, require_text};

/// An admin, staff member or customer.
///
/// Customer fields (`address`, `avatar_url`, `loyalty_points`) and staff fields
/// (`assigned_area`, `performance`) share one record; the role decides which
/// ones the panels show.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: String,
    pub phone: Phone,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub loyalty_points: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `PUT /api/users/profile`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    pub name: Option<String>,
    pub address: Option<String>,
    pub avatar_url: Option<String>,
}

/// A validated profile update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub avatar_url: Option<String>,
}

impl ProfileInput {
    /// Validate the update.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if a name is given but blank.
    pub fn validate(&self) -> Result<ProfileUpdate, ValidationError> {
        let name = self
            .name
            .as_deref()
            .map(|n| require_text("name", n))
            .transpose()?;

        Ok(ProfileUpdate {
            name,
            address: optional_text(self.address.as_deref()),
            avatar_url: optional_text(self.avatar_url.as_deref()),
        })
    }
}

/// Body of `POST /api/users/staff` and `PUT /api/users/staff/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffInput {
    pub name: String,
    pub phone: String,
    pub assigned_area: Option<String>,
    pub performance: Option<i32>,
}

/// A validated staff record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStaff {
    pub name: String,
    pub phone: Phone,
    pub assigned_area: Option<String>,
    pub performance: Option<i32>,
}

impl StaffInput {
    /// Validate the staff fields.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for a blank name, a malformed phone number or
    /// a performance score outside 0-100.
    pub fn validate(&self) -> Result<NewStaff, ValidationError> {
        let name = require_text("name", &self.name)?;
        let phone = Phone::parse(&self.phone).map_err(|e| ValidationError(e.to_string()))?;

        if let Some(score) = self.performance
            && !(0..=100).contains(&score)
        {
            return Err(ValidationError::new("performance must be between 0 and 100"));
        }

        Ok(NewStaff {
            name,
            phone,
            assigned_area: optional_text(self.assigned_area.as_deref()),
            performance: self.performance,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn staff_input() -> StaffInput {
        StaffInput {
            name: "Ravi".to_owned(),
            phone: "98765 43210".to_owned(),
            assigned_area: Some("Sector 5".to_owned()),
            performance: Some(92),
        }
    }

    #[test]
    fn test_staff_input_valid() {
        let staff = staff_input().validate().unwrap();
        assert_eq!(staff.phone.as_str(), "9876543210");
        assert_eq!(staff.assigned_area.as_deref(), Some("Sector 5"));
    }

    #[test]
    fn test_staff_input_rejects_bad_performance() {
        let mut input = staff_input();
        input.performance = Some(101);
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_staff_input_rejects_bad_phone() {
        let mut input = staff_input();
        input.phone = "12".to_owned();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_profile_input_rejects_blank_name() {
        let input = ProfileInput {
            name: Some("  ".to_owned()),
            ..ProfileInput::default()
        };
        assert!(input.validate().is_err());

        let input = ProfileInput {
            address: Some("12 Gandhi Road".to_owned()),
            ..ProfileInput::default()
        };
        let update = input.validate().unwrap();
        assert_eq!(update.name, None);
        assert_eq!(update.address.as_deref(), Some("12 Gandhi Road"));
    }

    #[test]
    fn test_user_json_shape() {
        let user = User {
            id: UserId::new(7),
            name: "New Customer".to_owned(),
            phone: Phone::parse("9876543210").unwrap(),
            role: Role::Customer,
            address: None,
            avatar_url: None,
            loyalty_points: 0,
            assigned_area: None,
            performance: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["_id"], 7);
        assert_eq!(json["role"], "customer");
        assert_eq!(json["loyaltyPoints"], 0);
        assert!(json.get("address").is_none());
    }
}
