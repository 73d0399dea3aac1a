//! Types shared by the recommendation channels.

use data_loader::{Item, ItemId, Level, Tag};
use serde::Serialize;
use std::fmt;

/// Which channel produced an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrySource {
    /// Ranked by the content score
    Content,
    /// Taken from the nearest useful peer's history
    Collaborative,
    /// Sampled from low-interest tags for exploration
    Discovery,
}

impl EntrySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntrySource::Content => "content",
            EntrySource::Collaborative => "collaborative",
            EntrySource::Discovery => "discovery",
        }
    }
}

impl fmt::Display for EntrySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of a recommendation list.
///
/// Produced fresh on every ranking pass and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub item_id: ItemId,
    pub title: String,
    pub tags: Vec<Tag>,
    pub level: Level,
    pub score: f64,
    pub source: EntrySource,
}

impl RankedEntry {
    pub fn new(item: &Item, score: f64, source: EntrySource) -> Self {
        Self {
            item_id: item.id.clone(),
            title: item.title.clone(),
            tags: item.tags.clone(),
            level: item.level,
            score,
            source,
        }
    }

    /// Same entry, credited to another channel
    pub fn with_source(mut self, source: EntrySource) -> Self {
        self.source = source;
        self
    }
}
