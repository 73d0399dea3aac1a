//! Whole-collection stores for profiles and items.
//!
//! The recommender never talks to files directly: callers load a full
//! collection, hand it to the core, and save the full collection back.
//! There is no partial update API and no locking; callers that share a
//! file must serialize their load/compute/save cycles themselves.

use crate::error::Result;
use crate::parser;
use crate::types::{Item, Profile};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Source and sink of the profile collection
pub trait ProfileStore {
    /// Load every profile
    fn load(&self) -> Result<Vec<Profile>>;

    /// Replace the stored collection with `profiles`
    fn save(&self, profiles: &[Profile]) -> Result<()>;
}

/// Read-only source of the item collection
pub trait ItemStore {
    /// Load every item
    fn load(&self) -> Result<Vec<Item>>;
}

/// Profiles kept as a JSON array in a single file
#[derive(Debug, Clone)]
pub struct JsonProfileStore {
    path: PathBuf,
}

impl JsonProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProfileStore for JsonProfileStore {
    fn load(&self) -> Result<Vec<Profile>> {
        let profiles = parser::parse_profiles(&self.path)?;
        debug!("Loaded {} profiles from {}", profiles.len(), self.path.display());
        Ok(profiles)
    }

    fn save(&self, profiles: &[Profile]) -> Result<()> {
        write_json(&self.path, profiles)?;
        debug!("Saved {} profiles to {}", profiles.len(), self.path.display());
        Ok(())
    }
}

/// Items kept as a JSON array in a single file
#[derive(Debug, Clone)]
pub struct JsonItemStore {
    path: PathBuf,
}

impl JsonItemStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the stored items.
    ///
    /// Not part of [`ItemStore`]: only data generation tools write items.
    pub fn save(&self, items: &[Item]) -> Result<()> {
        write_json(&self.path, items)
    }
}

impl ItemStore for JsonItemStore {
    fn load(&self) -> Result<Vec<Item>> {
        let items = parser::parse_items(&self.path)?;
        debug!("Loaded {} items from {}", items.len(), self.path.display());
        Ok(items)
    }
}

fn write_json<T: serde::Serialize>(path: &Path, records: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let document = serde_json::to_string_pretty(records)?;
    fs::write(path, document)?;
    Ok(())
}
