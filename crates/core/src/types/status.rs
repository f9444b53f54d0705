//! Roles and status enums for users, deliveries, subscriptions and orders.

use serde::{Deserialize, Serialize};

/// Role of a user. Each role gets its own panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "dairy.user_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Customer,
    Staff,
    Admin,
}

impl Role {
    /// Name given to a user created on first login.
    #[must_use]
    pub const fn default_name(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Staff => "New Staff",
            Self::Customer => "New Customer",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Staff => write!(f, "staff"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "staff" => Ok(Self::Staff),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

/// Delivery progress.
///
/// The flow is linear: `Pending -> Out for Delivery -> Delivered | Returned`.
/// `Delivered` and `Returned` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "dairy.delivery_status", rename_all = "snake_case")
)]
pub enum DeliveryStatus {
    #[default]
    Pending,
    #[serde(rename = "Out for Delivery")]
    OutForDelivery,
    Delivered,
    Returned,
}

impl DeliveryStatus {
    /// Whether the delivery is still in progress.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::OutForDelivery)
    }

    /// Whether a delivery in this status may move to `next`.
    ///
    /// Re-applying the current status is allowed and is a no-op for callers.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Pending | Self::OutForDelivery)
                | (
                    Self::OutForDelivery,
                    Self::OutForDelivery | Self::Delivered | Self::Returned
                )
                | (Self::Delivered, Self::Delivered)
                | (Self::Returned, Self::Returned)
        )
    }
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::OutForDelivery => write!(f, "Out for Delivery"),
            Self::Delivered => write!(f, "Delivered"),
            Self::Returned => write!(f, "Returned"),
        }
    }
}

/// Whether a subscription is currently producing deliveries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "dairy.subscription_status", rename_all = "snake_case")
)]
pub enum SubscriptionStatus {
    #[default]
    Active,
    Paused,
}

impl SubscriptionStatus {
    /// The status a pause/resume toggle moves to.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Paused,
            Self::Paused => Self::Active,
        }
    }
}

/// How often a subscription delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "dairy.subscription_frequency", rename_all = "snake_case")
)]
pub enum SubscriptionFrequency {
    Daily,
    #[serde(rename = "Alternate Days")]
    AlternateDays,
    Weekly,
}

impl SubscriptionFrequency {
    /// Days between two deliveries.
    #[must_use]
    pub const fn interval_days(self) -> i64 {
        match self {
            Self::Daily => 1,
            Self::AlternateDays => 2,
            Self::Weekly => 7,
        }
    }
}

/// Payment state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "dairy.order_status", rename_all = "snake_case")
)]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip_strings() {
        for role in [Role::Customer, Role::Staff, Role::Admin] {
            assert_eq!(role.to_string().parse::<Role>(), Ok(role));
            assert_eq!(
                serde_json::to_string(&role).unwrap(),
                format!("\"{role}\"")
            );
        }
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_default_names() {
        assert_eq!(Role::Admin.default_name(), "Admin");
        assert_eq!(Role::Staff.default_name(), "New Staff");
        assert_eq!(Role::Customer.default_name(), "New Customer");
    }

    #[test]
    fn test_delivery_forward_transitions() {
        use DeliveryStatus::{Delivered, OutForDelivery, Pending, Returned};

        assert!(Pending.can_transition_to(OutForDelivery));
        assert!(OutForDelivery.can_transition_to(Delivered));
        assert!(OutForDelivery.can_transition_to(Returned));
    }

    #[test]
    fn test_delivery_rejected_transitions() {
        use DeliveryStatus::{Delivered, OutForDelivery, Pending, Returned};

        assert!(!Pending.can_transition_to(Delivered));
        assert!(!Pending.can_transition_to(Returned));
        assert!(!OutForDelivery.can_transition_to(Pending));
        assert!(!Delivered.can_transition_to(Returned));
        assert!(!Returned.can_transition_to(OutForDelivery));
    }

    #[test]
    fn test_delivery_same_status_is_allowed() {
        for status in [
            DeliveryStatus::Pending,
            DeliveryStatus::OutForDelivery,
            DeliveryStatus::Delivered,
            DeliveryStatus::Returned,
        ] {
            assert!(status.can_transition_to(status));
        }
    }

    #[test]
    fn test_delivery_status_json_labels() {
        assert_eq!(
            serde_json::to_string(&DeliveryStatus::OutForDelivery).unwrap(),
            "\"Out for Delivery\""
        );
        assert_eq!(
            serde_json::from_str::<DeliveryStatus>("\"Returned\"").unwrap(),
            DeliveryStatus::Returned
        );
        assert!(DeliveryStatus::OutForDelivery.is_active());
        assert!(!DeliveryStatus::Delivered.is_active());
    }

    #[test]
    fn test_subscription_toggle() {
        assert_eq!(SubscriptionStatus::Active.toggled(), SubscriptionStatus::Paused);
        assert_eq!(SubscriptionStatus::Paused.toggled(), SubscriptionStatus::Active);
        assert_eq!(SubscriptionFrequency::AlternateDays.interval_days(), 2);
        assert_eq!(
            serde_json::from_str::<SubscriptionFrequency>("\"Alternate Days\"").unwrap(),
            SubscriptionFrequency::AlternateDays
        );
    }
}
