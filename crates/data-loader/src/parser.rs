//! Parsers for the profile and article documents.
//!
//! Both files are JSON arrays of records:
//! - users.json: `[{"user_id", "name", "weights", "mastery", "history"}, ...]`
//! - articles.json: `[{"article_id", "title", "tags", "level", "content"?}, ...]`
//!
//! serde rejects records with missing or mistyped fields; the `validate_*`
//! functions then enforce the invariants serde cannot express. Nothing that
//! fails here ever reaches the recommender.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::Path;

/// Read a whole file, mapping a missing file to [`DataLoadError::FileNotFound`]
fn read_document(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })
}

fn malformed(entity: &str, id: &str, reason: impl Into<String>) -> DataLoadError {
    DataLoadError::MalformedRecord {
        entity: entity.to_string(),
        id: id.to_string(),
        reason: reason.into(),
    }
}

/// Parse the profiles file
pub fn parse_profiles(path: &Path) -> Result<Vec<Profile>> {
    let document = read_document(path)?;
    parse_profiles_str(&document)
}

/// Parse a profiles document already in memory
pub fn parse_profiles_str(document: &str) -> Result<Vec<Profile>> {
    let profiles: Vec<Profile> = serde_json::from_str(document)?;

    let mut seen = HashSet::new();
    for profile in &profiles {
        if !seen.insert(profile.id.as_str()) {
            return Err(DataLoadError::DuplicateId {
                entity: "profile".to_string(),
                id: profile.id.clone(),
            });
        }
        validate_profile(profile)?;
    }
    Ok(profiles)
}

/// Parse the articles file
pub fn parse_items(path: &Path) -> Result<Vec<Item>> {
    let document = read_document(path)?;
    parse_items_str(&document)
}

/// Parse an articles document already in memory
pub fn parse_items_str(document: &str) -> Result<Vec<Item>> {
    let items: Vec<Item> = serde_json::from_str(document)?;

    let mut seen = HashSet::new();
    for item in &items {
        if !seen.insert(item.id.as_str()) {
            return Err(DataLoadError::DuplicateId {
                entity: "item".to_string(),
                id: item.id.clone(),
            });
        }
        validate_item(item)?;
    }
    Ok(items)
}

/// Check the invariants of a single profile record
///
/// History references are checked separately, once items are known
/// (see [`crate::Catalog::validate`]).
pub fn validate_profile(profile: &Profile) -> Result<()> {
    if profile.id.trim().is_empty() {
        return Err(malformed("profile", &profile.id, "empty user_id"));
    }

    for (tag, &weight) in &profile.affinity {
        if !weight.is_finite() || weight < 0.0 {
            return Err(malformed(
                "profile",
                &profile.id,
                format!("weight for '{}' must be a non-negative number, got {}", tag, weight),
            ));
        }
    }

    let mut seen = HashSet::new();
    for item_id in &profile.history {
        if !seen.insert(item_id.as_str()) {
            return Err(malformed(
                "profile",
                &profile.id,
                format!("'{}' appears twice in history", item_id),
            ));
        }
    }
    Ok(())
}

/// Check the invariants of a single item record
pub fn validate_item(item: &Item) -> Result<()> {
    if item.id.trim().is_empty() {
        return Err(malformed("item", &item.id, "empty article_id"));
    }
    if item.tags.is_empty() {
        return Err(malformed("item", &item.id, "at least one tag is required"));
    }
    if item.tags.iter().any(|tag| tag.trim().is_empty()) {
        return Err(malformed("item", &item.id, "tags must not be blank"));
    }
    Ok(())
}
