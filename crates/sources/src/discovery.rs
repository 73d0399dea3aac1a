//! Discovery Source - exploration of under-exposed topics
//!
//! Surfaces items from tags the profile barely engages with, so the
//! recommendations don't collapse onto a handful of favourite topics.
//!
//! ## Algorithm
//! 1. Low-interest tags: profile tags whose affinity is below the threshold.
//!    If every tag is above it, use all of the profile's tags instead.
//! 2. Pool: items not consumed, not excluded by the caller, and carrying at
//!    least one low-interest tag
//! 3. Sample `min(slots, pool size)` items uniformly without replacement
//!
//! Selection is random, not score-driven. Each pick is still scored so the
//! list displays consistently, but the score plays no part in choosing it.

use crate::scoring::ScoreCalculator;
use crate::types::{EntrySource, RankedEntry};
use data_loader::{Item, Profile};
use rand::Rng;
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Samples exploration candidates from low-interest tags
#[derive(Debug, Clone)]
pub struct DiversitySelector {
    /// Affinity under which a tag counts as low-interest
    low_interest_threshold: f64,
}

impl DiversitySelector {
    pub fn new() -> Self {
        Self {
            low_interest_threshold: 1.5,
        }
    }

    /// Configure the low-interest threshold (default: 1.5)
    pub fn with_low_interest_threshold(mut self, threshold: f64) -> Self {
        self.low_interest_threshold = threshold;
        self
    }

    /// Tags this profile should be nudged towards
    pub fn low_interest_tags<'p>(&self, profile: &'p Profile) -> HashSet<&'p str> {
        let low: HashSet<&str> = profile
            .affinity
            .iter()
            .filter(|&(_, &weight)| weight < self.low_interest_threshold)
            .map(|(tag, _)| tag.as_str())
            .collect();

        if low.is_empty() {
            profile.affinity.keys().map(String::as_str).collect()
        } else {
            low
        }
    }

    /// Items eligible for exploration, in collection order
    pub fn candidate_pool<'i>(
        &self,
        profile: &Profile,
        items: &'i [Item],
        excluded: &HashSet<&str>,
    ) -> Vec<&'i Item> {
        let low_interest = self.low_interest_tags(profile);
        let consumed: HashSet<&str> = profile.history.iter().map(String::as_str).collect();
        let mut seen: HashSet<&str> = HashSet::new();

        items
            .iter()
            .filter(|item| {
                !consumed.contains(item.id.as_str())
                    && !excluded.contains(item.id.as_str())
                    && item.has_any_tag(low_interest.iter().copied())
            })
            .filter(|item| seen.insert(item.id.as_str()))
            .collect()
    }

    /// Draw up to `slots` exploration entries
    #[instrument(skip(self, profile, items, excluded, scorer, rng), fields(profile_id = %profile.id))]
    pub fn select<R: Rng + ?Sized>(
        &self,
        profile: &Profile,
        items: &[Item],
        excluded: &HashSet<&str>,
        slots: usize,
        scorer: &ScoreCalculator,
        rng: &mut R,
    ) -> Vec<RankedEntry> {
        if slots == 0 {
            return Vec::new();
        }

        let pool = self.candidate_pool(profile, items, excluded);
        let amount = slots.min(pool.len());
        debug!("Discovery pool has {} items, drawing {}", pool.len(), amount);

        rand::seq::index::sample(rng, pool.len(), amount)
            .into_iter()
            .map(|index| {
                let item = pool[index];
                let score = scorer.score(profile, item, rng);
                RankedEntry::new(item, score, EntrySource::Discovery)
            })
            .collect()
    }
}

impl Default for DiversitySelector {
    fn default() -> Self {
        Self::new()
    }
}
