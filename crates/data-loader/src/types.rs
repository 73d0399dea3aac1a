//! Core domain types for profiles and articles.
//!
//! The serialized field names follow the existing data files
//! (`user_id`, `weights`, `article_id`, ...) so that documents written by
//! other tools load unchanged and round-trip exactly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a profile (e.g. `user_0`)
pub type ProfileId = String;

/// Unique identifier for an item (e.g. `article_42`)
pub type ItemId = String;

/// A topic label attached to items and weighted in profiles
pub type Tag = String;

/// Difficulty / skill level. Signed so level differences stay in the same type.
pub type Level = i32;

/// Level assumed for a tag the profile has no mastery entry for
pub const DEFAULT_MASTERY: Level = 1;

/// Round a weight or score to 2 decimal places.
///
/// Every stored weight and every returned score goes through this.
pub fn round_weight(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// =============================================================================
// Profile
// =============================================================================

/// One user's interest profile.
///
/// Invariants (checked by [`crate::parser`] on load, preserved by updates):
/// - affinity weights are never negative
/// - `history` has no duplicates and only names existing items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "user_id")]
    pub id: ProfileId,
    pub name: String,
    /// Measured interest per tag. A missing tag counts as 0.
    #[serde(rename = "weights")]
    pub affinity: BTreeMap<Tag, f64>,
    /// Skill level per tag. A missing tag counts as [`DEFAULT_MASTERY`].
    #[serde(default)]
    pub mastery: BTreeMap<Tag, Level>,
    /// Consumed items, oldest first
    #[serde(default)]
    pub history: Vec<ItemId>,
}

impl Profile {
    /// Create an empty profile
    pub fn new(id: impl Into<ProfileId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            affinity: BTreeMap::new(),
            mastery: BTreeMap::new(),
            history: Vec::new(),
        }
    }

    /// Affinity for a tag, 0 if the profile has never seen it
    pub fn affinity_for(&self, tag: &str) -> f64 {
        self.affinity.get(tag).copied().unwrap_or(0.0)
    }

    /// Mastery level for a tag, [`DEFAULT_MASTERY`] if unknown
    pub fn mastery_for(&self, tag: &str) -> Level {
        self.mastery.get(tag).copied().unwrap_or(DEFAULT_MASTERY)
    }

    /// Whether the item is already in this profile's history
    pub fn has_consumed(&self, item_id: &str) -> bool {
        self.history.iter().any(|id| id == item_id)
    }

    /// Append an item to the history unless it is already there.
    ///
    /// Returns `true` if the history grew.
    pub fn record_consumption(&mut self, item_id: &str) -> bool {
        if self.has_consumed(item_id) {
            return false;
        }
        self.history.push(item_id.to_string());
        true
    }

    /// Tags sorted by affinity, strongest first (ties by tag name)
    pub fn top_interests(&self, n: usize) -> Vec<(&str, f64)> {
        let mut interests: Vec<(&str, f64)> = self
            .affinity
            .iter()
            .map(|(tag, &weight)| (tag.as_str(), weight))
            .collect();
        interests.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        interests.truncate(n);
        interests
    }
}

// =============================================================================
// Item
// =============================================================================

/// An article that can be recommended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "article_id")]
    pub id: ItemId,
    pub title: String,
    /// Non-empty. The first tag is the primary tag used for level matching.
    pub tags: Vec<Tag>,
    pub level: Level,
    /// Article body, carried through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Item {
    /// Create an item without a body
    pub fn new(id: impl Into<ItemId>, title: impl Into<String>, tags: Vec<Tag>, level: Level) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            tags,
            level,
            content: None,
        }
    }

    /// The tag used for level matching
    ///
    /// `None` only for records that skipped validation.
    pub fn primary_tag(&self) -> Option<&str> {
        self.tags.first().map(String::as_str)
    }

    /// Whether any of the item's tags is in `tags`
    pub fn has_any_tag<'a>(&self, mut tags: impl Iterator<Item = &'a str>) -> bool {
        tags.any(|tag| self.tags.iter().any(|own| own == tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_weight() {
        assert_eq!(round_weight(1.234), 1.23);
        assert_eq!(round_weight(1.235_1), 1.24);
        assert_eq!(round_weight(0.1 + 0.2), 0.3);
    }

    #[test]
    fn test_profile_defaults_for_unseen_tags() {
        let profile = Profile::new("user_0", "User0");
        assert_eq!(profile.affinity_for("Math"), 0.0);
        assert_eq!(profile.mastery_for("Math"), DEFAULT_MASTERY);
    }

    #[test]
    fn test_record_consumption_is_idempotent() {
        let mut profile = Profile::new("user_0", "User0");
        assert!(profile.record_consumption("article_1"));
        assert!(!profile.record_consumption("article_1"));
        assert_eq!(profile.history, vec!["article_1".to_string()]);
    }

    #[test]
    fn test_top_interests_order() {
        let mut profile = Profile::new("user_0", "User0");
        profile.affinity.insert("Art".to_string(), 0.5);
        profile.affinity.insert("Math".to_string(), 2.5);
        profile.affinity.insert("Psycho".to_string(), 1.0);

        let top = profile.top_interests(2);
        assert_eq!(top, vec![("Math", 2.5), ("Psycho", 1.0)]);
    }

    #[test]
    fn test_profile_uses_file_field_names() {
        let mut profile = Profile::new("user_3", "User3");
        profile.affinity.insert("Math".to_string(), 1.5);
        let json = serde_json::to_value(&profile).unwrap();

        assert_eq!(json["user_id"], "user_3");
        assert_eq!(json["weights"]["Math"], 1.5);
        assert!(json.get("affinity").is_none());
    }

    #[test]
    fn test_item_content_is_optional() {
        let json = r#"{"article_id": "article_0", "title": "Article0", "tags": ["Art"], "level": 2}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.content, None);
        assert_eq!(item.primary_tag(), Some("Art"));
        assert!(item.has_any_tag(["Math", "Art"].into_iter()));
        assert!(!item.has_any_tag(["Math"].into_iter()));
    }
}
