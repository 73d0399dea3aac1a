//! # Sources Crate
//!
//! This crate implements the three recommendation channels for articles.
//!
//! ## Components
//!
//! ### Content Source (`scoring`)
//! Per-item scoring from tag affinity and level progression:
//! - Sum of the profile's weights over the item's tags
//! - Bonus or penalty depending on how the item's level compares to the
//!   profile's mastery of its primary tag
//! - A small random jitter so repeated rankings don't freeze
//!
//! ### Collaborative Source (`neighbor`)
//! "Readers like you also read...":
//! - Euclidean distance between affinity vectors
//! - The closest peer that has read something the target hasn't
//!
//! ### Discovery Source (`discovery`)
//! Exploration of topics the profile under-weights:
//! - Random sample of unread items carrying low-interest tags
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{DiversitySelector, NeighborFinder, ScoreCalculator};
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//! let scorer = ScoreCalculator::new();
//!
//! let ranked = scorer.rank_unconsumed(&profile, &items, &mut rng);
//! let peer = NeighborFinder::new().find_useful_neighbor(&profile, &profiles);
//! let explore = DiversitySelector::new()
//!     .select(&profile, &items, &excluded, 2, &scorer, &mut rng);
//! ```
//!
//! All randomness comes from the `rng` argument; seed it to make runs
//! reproducible.

// Public modules
pub mod types;
pub mod scoring;
pub mod neighbor;
pub mod discovery;

// Re-export commonly used types
pub use types::{EntrySource, RankedEntry};
pub use scoring::{ScoreCalculator, ScoringWeights};
pub use neighbor::{affinity_distance, NeighborFinder, UsefulNeighbor};
pub use discovery::DiversitySelector;

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::Item;

    #[test]
    fn test_entry_creation() {
        let item = Item::new("article_1", "Article1", vec!["Math".to_string()], 2);
        let entry = RankedEntry::new(&item, 0.85, EntrySource::Content);

        assert_eq!(entry.item_id, "article_1");
        assert_eq!(entry.level, 2);
        assert_eq!(entry.score, 0.85);
        assert_eq!(entry.source, EntrySource::Content);

        let moved = entry.with_source(EntrySource::Collaborative);
        assert_eq!(moved.source, EntrySource::Collaborative);
    }

    #[test]
    fn test_entry_source_serializes_lowercase() {
        let json = serde_json::to_string(&EntrySource::Discovery).unwrap();
        assert_eq!(json, "\"discovery\"");
        assert_eq!(EntrySource::Collaborative.to_string(), "collaborative");
    }

    #[test]
    fn test_default_weights() {
        let weights = ScoringWeights::default();
        assert_eq!(weights.too_hard_penalty, 3.0);
        assert_eq!(weights.score_floor, 0.1);
        assert_eq!(weights.jitter_max, 0.2);
    }
}
