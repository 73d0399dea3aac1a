//! # Recommendation Assembler
//!
//! This module builds one recommendation list out of the three channels:
//! 1. Content: score every unread item, keep the best `content_percent`
//! 2. Collaborative: items from the nearest useful peer, up to
//!    `collaborative_percent`
//! 3. Discovery: random low-interest items for the slots still open
//! 4. Concatenate as collaborative, content, discovery
//! 5. Backfill from the rest of the content ranking if still short
//!
//! No item from the profile's history is ever returned, and no item is
//! returned twice.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use rand::Rng;
use tracing::{debug, info, instrument};

use crate::config::RecommenderConfig;
use crate::error::{RecommendError, Result};
use data_loader::{Item, Profile};
use sources::{DiversitySelector, EntrySource, NeighborFinder, RankedEntry, ScoreCalculator, UsefulNeighbor};

/// A finished recommendation list
#[derive(Debug, Clone)]
pub struct Recommendations<'a> {
    /// The profile the list was built for
    pub profile: &'a Profile,
    /// Collaborative block, then content, then discovery (and backfill)
    pub entries: Vec<RankedEntry>,
}

impl Recommendations<'_> {
    /// Entries produced by one channel, in list order
    pub fn from_source(&self, source: EntrySource) -> impl Iterator<Item = &RankedEntry> {
        self.entries.iter().filter(move |entry| entry.source == source)
    }
}

/// Coordinates the three channels into one list
#[derive(Debug, Clone)]
pub struct RecommendationAssembler {
    config: RecommenderConfig,
    scorer: ScoreCalculator,
    neighbors: NeighborFinder,
    diversity: DiversitySelector,
}

impl RecommendationAssembler {
    /// Build every channel from the configuration
    pub fn new(config: RecommenderConfig) -> Self {
        let scorer = ScoreCalculator::new().with_weights(config.scoring);
        let neighbors = NeighborFinder::new().with_min_new_items(config.min_new_items);
        let diversity = DiversitySelector::new().with_low_interest_threshold(config.low_interest_threshold);
        Self {
            config,
            scorer,
            neighbors,
            diversity,
        }
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    pub fn scorer(&self) -> &ScoreCalculator {
        &self.scorer
    }

    /// Main entry point: build a list of up to `top_n` entries for a profile
    ///
    /// # Returns
    /// The profile and its entries, or [`RecommendError::ProfileNotFound`].
    /// A sparse catalog yields a shorter list, not an error.
    #[instrument(skip(self, profiles, items, rng))]
    pub fn recommend<'a, R: Rng + ?Sized>(
        &self,
        profile_id: &str,
        profiles: &'a [Profile],
        items: &[Item],
        top_n: usize,
        rng: &mut R,
    ) -> Result<Recommendations<'a>> {
        let start_time = Instant::now();

        let profile = find_profile(profiles, profile_id)?;
        let (content_quota, collaborative_quota) = self.config.quotas(top_n);

        // Content ranking; what doesn't make the quota is kept for backfill
        let mut content = self.scorer.rank_unconsumed(profile, items, rng);
        let backfill = content.split_off(content_quota.min(content.len()));
        info!(
            "Content channel: {} entries, {} kept for backfill",
            content.len(),
            backfill.len()
        );

        let collaborative =
            self.collaborative_entries(profile, profiles, items, &content, collaborative_quota, rng);
        info!("Collaborative channel: {} entries", collaborative.len());

        let slots_needed = top_n.saturating_sub(content.len() + collaborative.len());
        let discovery = if slots_needed > 0 {
            let excluded: HashSet<&str> = content
                .iter()
                .chain(collaborative.iter())
                .map(|entry| entry.item_id.as_str())
                .collect();
            self.diversity
                .select(profile, items, &excluded, slots_needed, &self.scorer, rng)
        } else {
            Vec::new()
        };
        info!("Discovery channel: {} entries", discovery.len());

        let mut entries = Vec::with_capacity(top_n);
        entries.extend(collaborative);
        entries.extend(content);
        entries.extend(discovery);
        fill_from_ranking(&mut entries, backfill, top_n);

        info!(
            "Built {} recommendations for profile {} in {:.2?}",
            entries.len(),
            profile_id,
            start_time.elapsed()
        );
        Ok(Recommendations { profile, entries })
    }

    /// Peer suggestions, skipping anything the content list already holds
    fn collaborative_entries<R: Rng + ?Sized>(
        &self,
        profile: &Profile,
        profiles: &[Profile],
        items: &[Item],
        content: &[RankedEntry],
        quota: usize,
        rng: &mut R,
    ) -> Vec<RankedEntry> {
        if quota == 0 {
            return Vec::new();
        }
        let Some(neighbor) = self.neighbors.find_useful_neighbor(profile, profiles) else {
            return Vec::new();
        };

        let taken: HashSet<&str> = content.iter().map(|entry| entry.item_id.as_str()).collect();
        let mut by_id: HashMap<&str, &Item> = HashMap::with_capacity(items.len());
        for item in items {
            by_id.entry(item.id.as_str()).or_insert(item);
        }

        let mut seen: HashSet<&str> = HashSet::new();
        let entries: Vec<RankedEntry> = neighbor
            .new_items
            .iter()
            .filter(|id| !taken.contains(id.as_str()))
            .filter_map(|id| by_id.get(id.as_str()).copied())
            .filter(|item| seen.insert(item.id.as_str()))
            .take(quota)
            .map(|item| {
                let score = self.scorer.score(profile, item, rng);
                RankedEntry::new(item, score, EntrySource::Collaborative)
            })
            .collect();

        debug!(
            "Neighbor {} offered {} new items, {} used",
            neighbor.profile.id,
            neighbor.new_items.len(),
            entries.len()
        );
        entries
    }

    /// The peer the collaborative channel would use, for diagnostics
    pub fn find_useful_neighbor<'a>(
        &self,
        profile_id: &str,
        profiles: &'a [Profile],
    ) -> Result<Option<UsefulNeighbor<'a>>> {
        let profile = find_profile(profiles, profile_id)?;
        Ok(self.neighbors.find_useful_neighbor(profile, profiles))
    }
}

impl Default for RecommendationAssembler {
    fn default() -> Self {
        Self::new(RecommenderConfig::default())
    }
}

fn find_profile<'a>(profiles: &'a [Profile], profile_id: &str) -> Result<&'a Profile> {
    profiles
        .iter()
        .find(|p| p.id == profile_id)
        .ok_or_else(|| RecommendError::ProfileNotFound(profile_id.to_string()))
}

/// Append ranked entries not already in the list until it holds `top_n`
fn fill_from_ranking(entries: &mut Vec<RankedEntry>, ranked: Vec<RankedEntry>, top_n: usize) {
    if entries.len() >= top_n {
        return;
    }
    let mut included: HashSet<String> = entries.iter().map(|e| e.item_id.clone()).collect();
    let before = entries.len();

    for entry in ranked {
        if entries.len() >= top_n {
            break;
        }
        if included.insert(entry.item_id.clone()) {
            entries.push(entry);
        }
    }
    debug!("Backfilled {} entries", entries.len() - before);
}
