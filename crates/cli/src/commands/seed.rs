//! Seed the catalog from a YAML file.
//!
//! The file has three optional lists whose entries use the same field names as
//! the API request bodies:
//!
//! ```yaml
//! products:
//!   - name: A2 Cow Milk
//!     category: Milk
//!     price: 58
//!     imageUrl: /uploads/a2-milk.jpg
//!     origin: Gir cows, Mathura
//!     nutrition: "Fat 3.5%, Protein 3.2%"
//!     rating: 4.8
//! gallery:
//!   - { src: /uploads/barn.jpg, alt: Our barn, aspect: wide }
//! inventory:
//!   - { name: Cow Milk, type: Raw Material, quantity: 120, unit: Liters }
//! ```
//!
//! The whole file is validated before the database is touched.

use std::path::Path;

use serde::Deserialize;
use tracing::{error, info};

use yadukul_storefront::db::{GalleryRepository, InventoryRepository, ProductRepository};
use yadukul_storefront::models::gallery::GalleryImageInput;
use yadukul_storefront::models::inventory::InventoryItemInput;
use yadukul_storefront::models::product::{ProductDraft, ProductInput};

use super::CommandError;

/// Contents of a catalog seed file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogSeed {
    #[serde(default)]
    pub products: Vec<ProductInput>,
    #[serde(default)]
    pub gallery: Vec<GalleryImageInput>,
    #[serde(default)]
    pub inventory: Vec<InventoryItemInput>,
}

/// A seed file whose entries all passed validation.
#[derive(Debug)]
pub struct ValidatedSeed {
    pub products: Vec<ProductDraft>,
    pub gallery: Vec<GalleryImageInput>,
    pub inventory: Vec<InventoryItemInput>,
}

/// Rows written by a seeding run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub products: usize,
    pub gallery: usize,
    pub inventory: usize,
}

impl CatalogSeed {
    /// Validate every entry, collecting one message per bad entry.
    ///
    /// # Errors
    ///
    /// Returns the list of problems if any entry is invalid.
    pub fn validate(&self) -> Result<ValidatedSeed, Vec<String>> {
        let mut errors = Vec::new();

        let products = collect_valid(&self.products, "products", &mut errors, ProductInput::validate);
        let gallery = collect_valid(&self.gallery, "gallery", &mut errors, GalleryImageInput::validate);
        let inventory =
            collect_valid(&self.inventory, "inventory", &mut errors, InventoryItemInput::validate);

        if errors.is_empty() {
            Ok(ValidatedSeed {
                products,
                gallery,
                inventory,
            })
        } else {
            Err(errors)
        }
    }
}

fn collect_valid<I, O, E: std::fmt::Display>(
    entries: &[I],
    section: &str,
    errors: &mut Vec<String>,
    validate: impl Fn(&I) -> Result<O, E>,
) -> Vec<O> {
    entries
        .iter()
        .enumerate()
        .filter_map(|(i, entry)| match validate(entry) {
            Ok(valid) => Some(valid),
            Err(e) => {
                errors.push(format!("{section}[{i}]: {e}"));
                None
            }
        })
        .collect()
}

/// Parse and validate a seed file's contents.
///
/// # Errors
///
/// Returns `CommandError::Yaml` for malformed YAML and
/// `CommandError::Invalid` when entries fail validation.
pub fn parse(content: &str) -> Result<ValidatedSeed, CommandError> {
    let seed: CatalogSeed = serde_yaml::from_str(content)?;
    seed.validate().map_err(|errors| {
        error!("Seed file validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        CommandError::Invalid(format!("{} validation errors found", errors.len()))
    })
}

/// Load a catalog seed file into the database.
///
/// With `clear_existing`, the current products, gallery images and inventory
/// items are deleted first.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails validation, or a
/// database operation fails.
pub async fn catalog(file_path: &str, clear_existing: bool) -> Result<SeedSummary, CommandError> {
    let path = Path::new(file_path);
    info!(path = %file_path, "Loading catalog from file");

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CommandError::Read {
            path: file_path.to_owned(),
            source,
        })?;
    let seed = parse(&content)?;

    info!(
        products = seed.products.len(),
        gallery = seed.gallery.len(),
        inventory = seed.inventory.len(),
        "Seed file validated"
    );

    let pool = super::connect().await?;
    let products = ProductRepository::new(&pool);
    let gallery = GalleryRepository::new(&pool);
    let inventory = InventoryRepository::new(&pool);

    if clear_existing {
        let removed_products = products.delete_all().await?;
        let removed_images = gallery.delete_all().await?;
        let removed_items = inventory.delete_all().await?;
        info!(
            products = removed_products,
            gallery = removed_images,
            inventory = removed_items,
            "Cleared existing catalog"
        );
    }

    for draft in &seed.products {
        products.create(draft).await?;
    }
    for image in &seed.gallery {
        gallery.create(image).await?;
    }
    for item in &seed.inventory {
        inventory.create(item).await?;
    }

    let summary = SeedSummary {
        products: seed.products.len(),
        gallery: seed.gallery.len(),
        inventory: seed.inventory.len(),
    };

    info!("Seeding complete!");
    info!("  Products inserted: {}", summary.products);
    info!("  Gallery images inserted: {}", summary.gallery);
    info!("  Inventory items inserted: {}", summary.inventory);

    Ok(summary)
}
