//! Amenity category catalog.
//!
//! The catalog is fixed at process start and read-only afterwards. Its
//! iteration order is stable and defines the column order of every emitted
//! profile, so two runs over the same catalog produce identically-shaped
//! output even when individual listings degrade.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Built-in categories and the OSM `amenity` tag values that count as members.
const BUILTIN_CATEGORIES: &[(&str, &[&str])] = &[
    ("elementary_school", &["school", "kindergarten"]),
    ("middle_school", &["school"]),
    ("high_school", &["school"]),
    ("university", &["university", "college"]),
    ("subway_station", &["subway_entrance", "railway_station"]),
    ("bus_stop", &["bus_station", "bus_stop"]),
    ("train_station", &["railway_station"]),
    ("gym", &["gym", "fitness_centre"]),
    ("fitness_center", &["fitness_centre", "sports_centre"]),
    ("hospital", &["hospital"]),
    ("clinic", &["clinic", "doctors"]),
    ("pharmacy", &["pharmacy"]),
    ("park", &["park"]),
    ("playground", &["playground"]),
    ("sports_facility", &["sports_centre", "stadium"]),
    ("museum", &["museum"]),
    ("theater", &["theatre", "cinema"]),
    ("library", &["library"]),
    ("supermarket", &["supermarket"]),
    ("convenience_store", &["convenience"]),
    ("shopping_mall", &["mall"]),
    ("bank", &["bank"]),
    ("atm", &["atm"]),
    ("post_office", &["post_office"]),
    ("restaurant", &["restaurant"]),
    ("fast_food", &["fast_food"]),
    ("cafe", &["cafe"]),
    ("bar", &["bar", "pub"]),
    ("police_station", &["police"]),
    ("fire_station", &["fire_station"]),
];

/// One amenity category: a human-facing key, the provider tag values that
/// count as members, and the search radius.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmenityCategory {
    pub key: String,
    pub tags: Vec<String>,
    pub radius_meters: u32,
}

/// Ordered, validated amenity category catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Vec<AmenityCategory>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from explicit categories, validating them.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the catalog is empty, a key is
    /// empty or duplicated, a tag set is empty, or a radius is zero.
    pub fn new(categories: Vec<AmenityCategory>) -> Result<Self, ConfigError> {
        validate_categories(&categories)?;
        let index = categories
            .iter()
            .enumerate()
            .map(|(i, c)| (c.key.clone(), i))
            .collect();
        Ok(Self { categories, index })
    }

    /// The built-in default catalog, every category using `default_radius_meters`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if `default_radius_meters` is zero.
    pub fn builtin(default_radius_meters: u32) -> Result<Self, ConfigError> {
        let categories = BUILTIN_CATEGORIES
            .iter()
            .map(|(key, tags)| AmenityCategory {
                key: (*key).to_string(),
                tags: tags.iter().map(|t| (*t).to_string()).collect(),
                radius_meters: default_radius_meters,
            })
            .collect();
        Self::new(categories)
    }

    /// Look up a category by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AmenityCategory> {
        self.index.get(key).map(|&i| &self.categories[i])
    }

    /// Iterate categories in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, AmenityCategory> {
        self.categories.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a AmenityCategory;
    type IntoIter = std::slice::Iter<'a, AmenityCategory>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    categories: Vec<CategoryEntry>,
}

#[derive(Debug, Deserialize)]
struct CategoryEntry {
    key: String,
    tags: Vec<String>,
    /// Falls back to the configured default radius when omitted.
    radius_meters: Option<u32>,
}

/// Load and validate a category catalog from a YAML file.
///
/// Entries without an explicit radius inherit `default_radius_meters`.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path, default_radius_meters: u32) -> Result<Catalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let catalog_file: CatalogFile =
        serde_yaml::from_str(&content).map_err(ConfigError::CatalogFileParse)?;

    let categories = catalog_file
        .categories
        .into_iter()
        .map(|entry| AmenityCategory {
            key: entry.key,
            tags: entry.tags,
            radius_meters: entry.radius_meters.unwrap_or(default_radius_meters),
        })
        .collect();

    Catalog::new(categories)
}

fn validate_categories(categories: &[AmenityCategory]) -> Result<(), ConfigError> {
    if categories.is_empty() {
        return Err(ConfigError::Validation(
            "amenity catalog must contain at least one category".to_string(),
        ));
    }

    let mut seen_keys = std::collections::HashSet::new();

    for category in categories {
        if category.key.trim().is_empty() {
            return Err(ConfigError::Validation(
                "category key must be non-empty".to_string(),
            ));
        }

        if !seen_keys.insert(category.key.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate category key: '{}'",
                category.key
            )));
        }

        if category.tags.is_empty() {
            return Err(ConfigError::Validation(format!(
                "category '{}' must list at least one tag",
                category.key
            )));
        }

        if category.tags.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "category '{}' has an empty tag",
                category.key
            )));
        }

        if category.radius_meters == 0 {
            return Err(ConfigError::Validation(format!(
                "category '{}' must have a positive radius",
                category.key
            )));
        }
    }

    Ok(())
}
