//! Content Source - per-item scoring
//!
//! Scores a (profile, item) pair from two signals:
//! - Affinity: how much the profile likes the item's tags
//! - Level match: how the item's difficulty compares to the profile's
//!   mastery of the item's primary tag
//!
//! ## Algorithm
//! 1. Sum the profile's affinity over all item tags (unseen tags count 0)
//! 2. Add the level adjustment for `diff = item.level - mastery[primary tag]`:
//!    - `diff == 0` -> ideal match bonus
//!    - `diff == 1` -> stretch bonus
//!    - `diff > 1`  -> too-hard penalty
//!    - `diff < 0`  -> too-easy penalty
//! 3. Clamp to the score floor
//! 4. Add uniform jitter in `[0, jitter_max)` so rankings don't freeze
//! 5. Round to 2 decimals

use crate::types::{EntrySource, RankedEntry};
use data_loader::{round_weight, Item, Profile};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Tunable constants of the scoring function
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Added when the item level equals the profile's mastery
    pub ideal_match_bonus: f64,
    /// Added when the item is exactly one level above
    pub stretch_bonus: f64,
    /// Subtracted when the item is two or more levels above
    pub too_hard_penalty: f64,
    /// Subtracted when the item is below the profile's level
    pub too_easy_penalty: f64,
    /// Pre-jitter minimum of every score
    pub score_floor: f64,
    /// Upper bound (exclusive) of the random jitter
    pub jitter_max: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            ideal_match_bonus: 2.0,
            stretch_bonus: 0.5,
            too_hard_penalty: 3.0,
            too_easy_penalty: 1.0,
            score_floor: 0.1,
            jitter_max: 0.2,
        }
    }
}

/// Scores items for a profile
#[derive(Debug, Clone, Default)]
pub struct ScoreCalculator {
    weights: ScoringWeights,
}

impl ScoreCalculator {
    /// Create a calculator with the default weights
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all weights at once
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Configure the too-hard penalty (default: 3.0)
    pub fn with_too_hard_penalty(mut self, penalty: f64) -> Self {
        self.weights.too_hard_penalty = penalty;
        self
    }

    /// Configure the jitter bound (default: 0.2). Zero disables jitter.
    pub fn with_jitter_max(mut self, jitter_max: f64) -> Self {
        self.weights.jitter_max = jitter_max;
        self
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Level-match term for an item
    pub fn level_adjustment(&self, profile: &Profile, item: &Item) -> f64 {
        let Some(primary_tag) = item.primary_tag() else {
            return 0.0;
        };
        let diff = item.level - profile.mastery_for(primary_tag);

        match diff {
            0 => self.weights.ideal_match_bonus,
            1 => self.weights.stretch_bonus,
            d if d > 1 => -self.weights.too_hard_penalty,
            _ => -self.weights.too_easy_penalty,
        }
    }

    /// Deterministic part of the score: affinity + level term, floored
    pub fn base_score(&self, profile: &Profile, item: &Item) -> f64 {
        let affinity: f64 = item.tags.iter().map(|tag| profile.affinity_for(tag)).sum();
        let score = affinity + self.level_adjustment(profile, item);
        score.max(self.weights.score_floor)
    }

    /// Full score with jitter, rounded to 2 decimals
    pub fn score<R: Rng + ?Sized>(&self, profile: &Profile, item: &Item, rng: &mut R) -> f64 {
        let mut score = self.base_score(profile, item);
        if self.weights.jitter_max > 0.0 {
            score += rng.random_range(0.0..self.weights.jitter_max);
        }
        round_weight(score)
    }

    /// Score every item the profile hasn't consumed, best first.
    ///
    /// Items are scored in collection order and the sort is stable, so equal
    /// scores keep that order. An id that appears twice is ranked once.
    #[instrument(skip(self, profile, items, rng), fields(profile_id = %profile.id))]
    pub fn rank_unconsumed<R: Rng + ?Sized>(
        &self,
        profile: &Profile,
        items: &[Item],
        rng: &mut R,
    ) -> Vec<RankedEntry> {
        let consumed: HashSet<&str> = profile.history.iter().map(String::as_str).collect();
        let mut seen: HashSet<&str> = HashSet::new();

        let mut ranked: Vec<RankedEntry> = Vec::new();
        for item in items {
            if consumed.contains(item.id.as_str()) || !seen.insert(item.id.as_str()) {
                continue;
            }
            let score = self.score(profile, item, rng);
            ranked.push(RankedEntry::new(item, score, EntrySource::Content));
        }

        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        debug!("Ranked {} unconsumed items", ranked.len());
        ranked
    }
}
