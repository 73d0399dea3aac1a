//! Collaborative Source - nearest useful peer
//!
//! Suggests items through the profile whose tastes are closest:
//! "Readers with interests like yours also read..."
//!
//! ## Algorithm
//! 1. Measure the Euclidean distance between affinity vectors, over the union
//!    of both profiles' tags (a missing tag weighs 0)
//! 2. Sort every other profile by distance, ascending. The sort is stable, so
//!    equal distances keep collection order.
//! 3. Walk that order and stop at the first peer that has read at least
//!    `min_new_items` items the target hasn't
//!
//! The closest peer is not always useful: one who has read nothing new
//! contributes nothing, so the search moves on to the next one.

use data_loader::{ItemId, Profile};
use rayon::prelude::*;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, instrument};

/// Euclidean distance between two affinity vectors
pub fn affinity_distance(a: &Profile, b: &Profile) -> f64 {
    let tags: BTreeSet<&str> = a
        .affinity
        .keys()
        .chain(b.affinity.keys())
        .map(String::as_str)
        .collect();

    tags.into_iter()
        .map(|tag| {
            let delta = a.affinity_for(tag) - b.affinity_for(tag);
            delta * delta
        })
        .sum::<f64>()
        .sqrt()
}

/// Items `peer` has consumed that `target` hasn't, in the peer's history order
pub fn new_items_from(target: &Profile, peer: &Profile) -> Vec<ItemId> {
    let consumed: HashSet<&str> = target.history.iter().map(String::as_str).collect();
    peer.history
        .iter()
        .filter(|id| !consumed.contains(id.as_str()))
        .cloned()
        .collect()
}

/// The peer chosen for collaborative suggestions
#[derive(Debug, Clone, PartialEq)]
pub struct UsefulNeighbor<'a> {
    pub profile: &'a Profile,
    pub distance: f64,
    /// Peer history minus target history
    pub new_items: Vec<ItemId>,
}

/// Finds the closest peer that has something new to offer
#[derive(Debug, Clone)]
pub struct NeighborFinder {
    /// Minimum number of unseen items a peer must bring
    min_new_items: usize,
}

impl NeighborFinder {
    pub fn new() -> Self {
        Self { min_new_items: 1 }
    }

    /// Configure how many new items make a peer useful (default: 1)
    pub fn with_min_new_items(mut self, min: usize) -> Self {
        self.min_new_items = min;
        self
    }

    pub fn min_new_items(&self) -> usize {
        self.min_new_items
    }

    /// Every other profile with its distance to `target`, closest first
    pub fn rank_peers<'a>(&self, target: &Profile, profiles: &'a [Profile]) -> Vec<(&'a Profile, f64)> {
        // par_iter + collect keeps collection order, so the stable sort
        // below still breaks ties by position
        let mut peers: Vec<(&'a Profile, f64)> = profiles
            .par_iter()
            .filter(|peer| peer.id != target.id)
            .map(|peer| (peer, affinity_distance(target, peer)))
            .collect();

        peers.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        peers
    }

    /// The closest peer with at least `min_new_items` unseen items, if any
    #[instrument(skip(self, target, profiles), fields(profile_id = %target.id))]
    pub fn find_useful_neighbor<'a>(
        &self,
        target: &Profile,
        profiles: &'a [Profile],
    ) -> Option<UsefulNeighbor<'a>> {
        let peers = self.rank_peers(target, profiles);
        debug!("Ranked {} peers by affinity distance", peers.len());

        for (peer, distance) in peers {
            let new_items = new_items_from(target, peer);
            if new_items.len() >= self.min_new_items {
                debug!(
                    "Useful neighbor {} at distance {:.3} with {} new items",
                    peer.id,
                    distance,
                    new_items.len()
                );
                return Some(UsefulNeighbor {
                    profile: peer,
                    distance,
                    new_items,
                });
            }
        }

        debug!("No peer has enough new items");
        None
    }
}

impl Default for NeighborFinder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: &str, weights: &[(&str, f64)], history: &[&str]) -> Profile {
        let mut profile = Profile::new(id, id.to_uppercase());
        for &(tag, weight) in weights {
            profile.affinity.insert(tag.to_string(), weight);
        }
        profile.history = history.iter().map(|s| s.to_string()).collect();
        profile
    }

    #[test]
    fn test_distance_over_union_of_tags() {
        let a = profile("a", &[("Math", 1.0), ("Art", 2.0)], &[]);
        let b = profile("b", &[("Math", 4.0), ("Psycho", 4.0)], &[]);

        // Math: 3, Art: 2, Psycho: 4 -> sqrt(9 + 4 + 16)
        let expected = 29.0_f64.sqrt();
        assert!((affinity_distance(&a, &b) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_distance_symmetry_and_identity() {
        let a = profile("a", &[("Math", 1.3), ("Art", 0.2)], &[]);
        let b = profile("b", &[("Geologie", 2.7)], &[]);

        assert_eq!(affinity_distance(&a, &b), affinity_distance(&b, &a));
        assert_eq!(affinity_distance(&a, &a), 0.0);

        // Explicit zero and missing tag are the same vector
        let c = profile("c", &[("Math", 1.3), ("Art", 0.2), ("Art2", 0.0)], &[]);
        assert_eq!(affinity_distance(&a, &c), 0.0);
    }

    #[test]
    fn test_closest_peer_without_new_items_is_skipped() {
        let target = profile("t", &[("Math", 2.0)], &["x"]);
        let profiles = vec![
            target.clone(),
            // Closest, but has only read what target read
            profile("twin", &[("Math", 2.0)], &["x"]),
            profile("near", &[("Math", 2.5)], &["x", "y", "z"]),
            profile("far", &[("Math", 9.0)], &["w"]),
        ];

        let neighbor = NeighborFinder::new()
            .find_useful_neighbor(&target, &profiles)
            .unwrap();
        assert_eq!(neighbor.profile.id, "near");
        assert_eq!(neighbor.distance, 0.5);
        assert_eq!(neighbor.new_items, vec!["y".to_string(), "z".to_string()]);
    }

    #[test]
    fn test_min_new_items() {
        let target = profile("t", &[("Math", 2.0)], &[]);
        let profiles = vec![
            profile("near", &[("Math", 2.1)], &["a"]),
            profile("far", &[("Math", 5.0)], &["b", "c"]),
        ];

        let neighbor = NeighborFinder::new()
            .with_min_new_items(2)
            .find_useful_neighbor(&target, &profiles)
            .unwrap();
        assert_eq!(neighbor.profile.id, "far");
    }

    #[test]
    fn test_ties_keep_collection_order() {
        let target = profile("t", &[("Math", 1.0)], &[]);
        let profiles = vec![
            profile("first", &[("Math", 2.0)], &["a"]),
            profile("second", &[("Math", 0.0)], &["b"]),
        ];

        let finder = NeighborFinder::new();
        let ranked: Vec<&str> = finder
            .rank_peers(&target, &profiles)
            .iter()
            .map(|(p, _)| p.id.as_str())
            .collect();
        assert_eq!(ranked, vec!["first", "second"]);
        assert_eq!(
            finder.find_useful_neighbor(&target, &profiles).unwrap().profile.id,
            "first"
        );
    }

    #[test]
    fn test_no_useful_neighbor() {
        let target = profile("t", &[("Math", 1.0)], &["a"]);
        let profiles = vec![target.clone(), profile("p", &[("Math", 1.0)], &["a"])];

        assert!(NeighborFinder::new().find_useful_neighbor(&target, &profiles).is_none());
        assert!(NeighborFinder::new().find_useful_neighbor(&target, &[]).is_none());
    }
}
