//! Catalog and dairy-floor enums: product categories, inventory kinds and units,
//! milk sources.
//!
//! JSON uses the human-readable labels the panels display (`"Raw Material"`,
//! `"Liters"`); the database stores snake_case enum labels.

use serde::{Deserialize, Serialize};

/// Product category shown in the catalog filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "dairy.product_category", rename_all = "snake_case")
)]
pub enum ProductCategory {
    Milk,
    Ghee,
    Paneer,
    Butter,
    Curd,
}

impl ProductCategory {
    /// Display label, identical to the JSON form.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Milk => "Milk",
            Self::Ghee => "Ghee",
            Self::Paneer => "Paneer",
            Self::Butter => "Butter",
            Self::Curd => "Curd",
        }
    }
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for ProductCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "milk" => Ok(Self::Milk),
            "ghee" => Ok(Self::Ghee),
            "paneer" => Ok(Self::Paneer),
            "butter" => Ok(Self::Butter),
            "curd" => Ok(Self::Curd),
            _ => Err(format!("invalid product category: {s}")),
        }
    }
}

/// Whether an inventory line is an input or an output of the dairy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "dairy.inventory_kind", rename_all = "snake_case")
)]
pub enum InventoryKind {
    #[serde(rename = "Raw Material")]
    RawMaterial,
    #[serde(rename = "Finished Product")]
    FinishedProduct,
}

impl std::fmt::Display for InventoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RawMaterial => f.write_str("Raw Material"),
            Self::FinishedProduct => f.write_str("Finished Product"),
        }
    }
}

/// Unit an inventory quantity is counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "dairy.inventory_unit", rename_all = "snake_case")
)]
pub enum InventoryUnit {
    Liters,
    #[serde(rename = "kg")]
    Kg,
    Units,
}

impl std::fmt::Display for InventoryUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Liters => f.write_str("Liters"),
            Self::Kg => f.write_str("kg"),
            Self::Units => f.write_str("Units"),
        }
    }
}

/// Unit a conversion batch output is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "dairy.output_unit", rename_all = "snake_case")
)]
pub enum OutputUnit {
    #[serde(rename = "kg")]
    Kg,
    Units,
}

/// Animal the raw milk came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "dairy.milk_type", rename_all = "snake_case")
)]
pub enum MilkType {
    Cow,
    Buffalo,
}
