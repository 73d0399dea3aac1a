//! Profile updates from feedback and time.
//!
//! Two ways a profile evolves between ranking passes:
//! - An interaction (read / like / quiz) adds points to every tag of the item
//! - A decay tick shrinks every weight, down to a floor
//!
//! Both mutate profiles in place; persisting them is the caller's job.

use crate::config::DecayPolicy;
use crate::error::{RecommendError, Result};
use data_loader::{round_weight, Item, ItemId, Profile, Tag};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, instrument, warn};

/// Kinds of feedback a profile can give on an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interaction {
    Read,
    Like,
    Quiz,
}

impl Interaction {
    /// Affinity added to each of the item's tags
    pub fn points(&self) -> f64 {
        match self {
            Interaction::Read => 0.2,
            Interaction::Like => 0.3,
            Interaction::Quiz => 0.5,
        }
    }

    /// Only reading counts as consuming the item
    pub fn marks_consumed(&self) -> bool {
        matches!(self, Interaction::Read)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Interaction::Read => "read",
            Interaction::Like => "like",
            Interaction::Quiz => "quiz",
        }
    }
}

impl fmt::Display for Interaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interaction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "read" => Ok(Interaction::Read),
            "like" => Ok(Interaction::Like),
            "quiz" => Ok(Interaction::Quiz),
            other => Err(format!("unknown interaction '{}', expected read, like or quiz", other)),
        }
    }
}

/// One tag's weight before and after an update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightChange {
    pub tag: Tag,
    pub old: f64,
    pub new: f64,
}

/// What an interaction changed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionOutcome {
    pub item_id: ItemId,
    pub interaction: Interaction,
    pub changes: Vec<WeightChange>,
    /// `true` if the item was appended to the history
    pub added_to_history: bool,
}

/// Applies interactions and decay to profiles
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdater {
    decay: DecayPolicy,
}

impl ProfileUpdater {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_decay(mut self, decay: DecayPolicy) -> Self {
        self.decay = decay;
        self
    }

    pub fn decay_policy(&self) -> &DecayPolicy {
        &self.decay
    }

    /// Apply an interaction to a profile.
    ///
    /// Affinity updates are not deduplicated: reading the same item twice
    /// adds its points twice, while the history keeps a single entry.
    pub fn apply_interaction(
        &self,
        profile: &mut Profile,
        item: &Item,
        interaction: Interaction,
    ) -> InteractionOutcome {
        let points = interaction.points();

        let changes = item
            .tags
            .iter()
            .map(|tag| {
                let old = profile.affinity_for(tag);
                let new = round_weight(old + points);
                profile.affinity.insert(tag.clone(), new);
                WeightChange {
                    tag: tag.clone(),
                    old,
                    new,
                }
            })
            .collect();

        let added_to_history = interaction.marks_consumed() && profile.record_consumption(&item.id);

        InteractionOutcome {
            item_id: item.id.clone(),
            interaction,
            changes,
            added_to_history,
        }
    }

    /// Look up both records and apply the interaction.
    ///
    /// The item is checked first: an unknown item aborts before anything
    /// changes. An unknown profile leaves the collection untouched.
    #[instrument(skip(self, profiles, items))]
    pub fn record_interaction(
        &self,
        profiles: &mut [Profile],
        items: &[Item],
        profile_id: &str,
        item_id: &str,
        interaction: Interaction,
    ) -> Result<InteractionOutcome> {
        let item = items
            .iter()
            .find(|item| item.id == item_id)
            .ok_or_else(|| RecommendError::ItemNotFound(item_id.to_string()))?;

        let Some(profile) = profiles.iter_mut().find(|p| p.id == profile_id) else {
            warn!("Interaction for unknown profile {} ignored", profile_id);
            return Err(RecommendError::ProfileNotFound(profile_id.to_string()));
        };

        let outcome = self.apply_interaction(profile, item, interaction);
        debug!(
            "{} on {} updated {} tags, history grew: {}",
            interaction,
            item_id,
            outcome.changes.len(),
            outcome.added_to_history
        );
        Ok(outcome)
    }

    /// Decay every weight of one profile
    pub fn decay_profile(&self, profile: &mut Profile) {
        let DecayPolicy { factor, floor } = self.decay;
        for weight in profile.affinity.values_mut() {
            *weight = round_weight(*weight * factor).max(floor);
        }
    }

    /// Decay every profile of the collection in one batch
    pub fn apply_decay(&self, profiles: &mut [Profile]) {
        profiles
            .par_iter_mut()
            .for_each(|profile| self.decay_profile(profile));

        info!(
            "Decayed {} profiles (factor {}, floor {})",
            profiles.len(),
            self.decay.factor,
            self.decay.floor
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> Item {
        Item::new(
            "article_7",
            "Article7",
            vec!["Math".to_string(), "Physique".to_string()],
            2,
        )
    }

    fn profile() -> Profile {
        let mut profile = Profile::new("user_0", "User0");
        profile.affinity.insert("Math".to_string(), 1.0);
        profile
    }

    #[test]
    fn test_interaction_points() {
        assert_eq!(Interaction::Read.points(), 0.2);
        assert_eq!(Interaction::Like.points(), 0.3);
        assert_eq!(Interaction::Quiz.points(), 0.5);
        assert_eq!("LIKE".parse::<Interaction>(), Ok(Interaction::Like));
        assert!("share".parse::<Interaction>().is_err());
    }

    #[test]
    fn test_read_updates_weights_and_history() {
        let updater = ProfileUpdater::new();
        let mut profile = profile();

        let outcome = updater.apply_interaction(&mut profile, &item(), Interaction::Read);

        assert_eq!(profile.affinity_for("Math"), 1.2);
        // Unseen tag starts from 0
        assert_eq!(profile.affinity_for("Physique"), 0.2);
        assert_eq!(profile.history, vec!["article_7".to_string()]);
        assert!(outcome.added_to_history);
        assert_eq!(
            outcome.changes[0],
            WeightChange { tag: "Math".to_string(), old: 1.0, new: 1.2 }
        );
    }

    #[test]
    fn test_read_twice_keeps_one_history_entry() {
        let updater = ProfileUpdater::new();
        let mut profile = profile();

        updater.apply_interaction(&mut profile, &item(), Interaction::Read);
        let second = updater.apply_interaction(&mut profile, &item(), Interaction::Read);

        assert_eq!(profile.history.len(), 1);
        assert!(!second.added_to_history);
        assert_eq!(profile.affinity_for("Math"), 1.4);
        assert_eq!(profile.affinity_for("Physique"), 0.4);
    }

    #[test]
    fn test_like_and_quiz_leave_history_alone() {
        let updater = ProfileUpdater::new();
        let mut profile = profile();

        updater.apply_interaction(&mut profile, &item(), Interaction::Like);
        updater.apply_interaction(&mut profile, &item(), Interaction::Quiz);

        assert!(profile.history.is_empty());
        assert_eq!(profile.affinity_for("Math"), 1.8);
    }

    #[test]
    fn test_unknown_item_changes_nothing() {
        let updater = ProfileUpdater::new();
        let mut profiles = vec![profile()];
        let before = profiles.clone();

        let result = updater.record_interaction(&mut profiles, &[item()], "user_0", "article_404", Interaction::Read);

        assert!(matches!(result, Err(RecommendError::ItemNotFound(_))));
        assert_eq!(profiles, before);
    }

    #[test]
    fn test_unknown_profile_is_reported() {
        let updater = ProfileUpdater::new();
        let mut profiles = vec![profile()];
        let before = profiles.clone();

        let result = updater.record_interaction(&mut profiles, &[item()], "user_404", "article_7", Interaction::Like);

        assert!(matches!(result, Err(RecommendError::ProfileNotFound(_))));
        assert_eq!(profiles, before);
    }

    #[test]
    fn test_decay_formula_and_floor() {
        let updater = ProfileUpdater::new();
        let mut first = Profile::new("a", "A");
        first.affinity.insert("Math".to_string(), 2.0);
        first.affinity.insert("Art".to_string(), 0.1);
        first.affinity.insert("Psycho".to_string(), 1.37);
        let mut second = Profile::new("b", "B");
        second.affinity.insert("Math".to_string(), 0.0);
        let mut profiles = vec![first, second];

        updater.apply_decay(&mut profiles);

        assert_eq!(profiles[0].affinity_for("Math"), 1.9);
        assert_eq!(profiles[0].affinity_for("Art"), 0.1);
        // 1.37 * 0.95 = 1.3015
        assert_eq!(profiles[0].affinity_for("Psycho"), 1.3);
        // Even a zero weight ends at the floor
        assert_eq!(profiles[1].affinity_for("Math"), 0.1);
    }

    #[test]
    fn test_custom_decay_policy() {
        let updater = ProfileUpdater::new().with_decay(DecayPolicy { factor: 0.5, floor: 0.25 });
        let mut profile = profile();
        profile.affinity.insert("Art".to_string(), 0.3);

        updater.decay_profile(&mut profile);

        assert_eq!(profile.affinity_for("Math"), 0.5);
        assert_eq!(profile.affinity_for("Art"), 0.25);
    }
}
