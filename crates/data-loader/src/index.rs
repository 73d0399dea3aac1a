//! The in-memory catalog of profiles and items.
//!
//! A [`Catalog`] is what the rest of the workspace works from: both
//! collections loaded wholesale, cross-checked, and indexed by id.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::store::{ItemStore, ProfileStore};
use crate::types::*;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::info;

/// Both collections plus an id index over the items.
///
/// Profiles and items keep their file order; the recommender relies on it
/// for stable tie-breaking.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    profiles: Vec<Profile>,
    items: Vec<Item>,
    item_positions: HashMap<ItemId, usize>,
}

impl Catalog {
    /// Build a catalog from collections that were already parsed.
    ///
    /// Runs the full validation, including history references.
    pub fn new(profiles: Vec<Profile>, items: Vec<Item>) -> Result<Self> {
        let item_positions = items
            .iter()
            .enumerate()
            .map(|(position, item)| (item.id.clone(), position))
            .collect();
        let catalog = Self {
            profiles,
            items,
            item_positions,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load both JSON files in parallel and validate them together
    pub fn load_from_files(profiles_path: &Path, items_path: &Path) -> Result<Self> {
        info!(
            "Loading profiles from {:?} and items from {:?}",
            profiles_path, items_path
        );

        // The two files are independent, parse them side by side
        let (profiles, items) = rayon::join(
            || parser::parse_profiles(profiles_path),
            || parser::parse_items(items_path),
        );
        let profiles = profiles?;
        let items = items?;

        info!("Loaded {} profiles, {} items", profiles.len(), items.len());
        Self::new(profiles, items)
    }

    /// Load through the store abstractions
    pub fn load(profile_store: &impl ProfileStore, item_store: &impl ItemStore) -> Result<Self> {
        let profiles = profile_store.load()?;
        let items = item_store.load()?;
        Self::new(profiles, items)
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    /// Mutable access for in-place updates; the caller persists the result
    pub fn profiles_mut(&mut self) -> &mut [Profile] {
        &mut self.profiles
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get_profile(&self, id: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    pub fn get_item(&self, id: &str) -> Option<&Item> {
        self.item_positions.get(id).map(|&position| &self.items[position])
    }

    /// Get counts for debugging/validation
    pub fn counts(&self) -> (usize, usize) {
        (self.profiles.len(), self.items.len())
    }

    /// Hand the collections back, e.g. to save them
    pub fn into_parts(self) -> (Vec<Profile>, Vec<Item>) {
        (self.profiles, self.items)
    }

    /// Validate data integrity
    ///
    /// Checks every record invariant and that each history entry names a
    /// known item.
    pub fn validate(&self) -> Result<()> {
        if self.item_positions.len() != self.items.len() {
            let mut seen = HashSet::new();
            for item in &self.items {
                if !seen.insert(item.id.as_str()) {
                    return Err(DataLoadError::DuplicateId {
                        entity: "item".to_string(),
                        id: item.id.clone(),
                    });
                }
            }
        }

        for item in &self.items {
            parser::validate_item(item)?;
        }

        for profile in &self.profiles {
            parser::validate_profile(profile)?;
            for item_id in &profile.history {
                if !self.item_positions.contains_key(item_id) {
                    return Err(DataLoadError::MissingReference {
                        entity: "Item".to_string(),
                        id: item_id.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{JsonItemStore, JsonProfileStore};

    fn item(id: &str) -> Item {
        Item::new(id, format!("Title {}", id), vec!["Math".to_string()], 1)
    }

    #[test]
    fn test_catalog_lookup() {
        let mut profile = Profile::new("user_0", "User0");
        profile.history.push("article_1".to_string());

        let catalog = Catalog::new(vec![profile], vec![item("article_0"), item("article_1")]).unwrap();

        assert_eq!(catalog.counts(), (1, 2));
        assert_eq!(catalog.get_item("article_1").unwrap().id, "article_1");
        assert!(catalog.get_item("article_9").is_none());
        assert_eq!(catalog.get_profile("user_0").unwrap().name, "User0");
        assert!(catalog.get_profile("user_9").is_none());
    }

    #[test]
    fn test_history_must_reference_items() {
        let mut profile = Profile::new("user_0", "User0");
        profile.history.push("article_404".to_string());

        let result = Catalog::new(vec![profile], vec![item("article_0")]);
        assert!(matches!(result, Err(DataLoadError::MissingReference { .. })));
    }

    #[test]
    fn test_duplicate_items_rejected() {
        let result = Catalog::new(vec![], vec![item("article_0"), item("article_0")]);
        assert!(matches!(result, Err(DataLoadError::DuplicateId { .. })));
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let profiles_path = dir.path().join("users.json");
        let items_path = dir.path().join("articles.json");

        JsonProfileStore::new(&profiles_path)
            .save(&[Profile::new("user_0", "User0")])
            .unwrap();
        JsonItemStore::new(&items_path).save(&[item("article_0")]).unwrap();

        let catalog = Catalog::load_from_files(&profiles_path, &items_path).unwrap();
        assert_eq!(catalog.counts(), (1, 1));

        let via_stores = Catalog::load(
            &JsonProfileStore::new(&profiles_path),
            &JsonItemStore::new(&items_path),
        )
        .unwrap();
        assert_eq!(via_stores.counts(), (1, 1));
    }
}
