//! Configuration for the recommender.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```json
//! { "top_n": 20, "scoring": { "too_hard_penalty": 5.0 }, "decay": { "factor": 0.9 } }
//! ```

use crate::error::{RecommendError, Result};
use data_loader::DataLoadError;
use serde::{Deserialize, Serialize};
use sources::ScoringWeights;
use std::io::ErrorKind;
use std::path::Path;

/// How affinity fades on each decay tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayPolicy {
    /// Multiplier applied to every weight
    pub factor: f64,
    /// No weight decays below this
    pub floor: f64,
}

impl Default for DecayPolicy {
    fn default() -> Self {
        Self {
            factor: 0.95,
            floor: 0.1,
        }
    }
}

/// All tunables of the ranking and update passes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    /// Length of a recommendation list
    pub top_n: usize,
    /// Share of `top_n` reserved for the content channel, in percent
    pub content_percent: usize,
    /// Share of `top_n` reserved for the collaborative channel, in percent
    pub collaborative_percent: usize,
    /// New items a peer must bring to be a useful neighbor
    pub min_new_items: usize,
    /// Affinity below which a tag is explored by the discovery channel
    pub low_interest_threshold: f64,
    pub scoring: ScoringWeights,
    pub decay: DecayPolicy,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            content_percent: 70,
            collaborative_percent: 15,
            min_new_items: 1,
            low_interest_threshold: 1.5,
            scoring: ScoringWeights::default(),
            decay: DecayPolicy::default(),
        }
    }
}

impl RecommenderConfig {
    /// Read a JSON config file and validate it
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let document = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => DataLoadError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => DataLoadError::IoError(e),
        })?;
        Self::from_json_str(&document)
    }

    pub fn from_json_str(document: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(document).map_err(DataLoadError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline can't work with
    pub fn validate(&self) -> Result<()> {
        if self.content_percent + self.collaborative_percent > 100 {
            return Err(RecommendError::InvalidConfig(format!(
                "content_percent + collaborative_percent must not exceed 100, got {}",
                self.content_percent + self.collaborative_percent
            )));
        }
        if !(self.decay.factor > 0.0 && self.decay.factor <= 1.0) {
            return Err(RecommendError::InvalidConfig(format!(
                "decay factor must be in (0, 1], got {}",
                self.decay.factor
            )));
        }
        if !(self.decay.floor >= 0.0) {
            return Err(RecommendError::InvalidConfig(format!(
                "decay floor must be non-negative, got {}",
                self.decay.floor
            )));
        }
        if !(self.scoring.jitter_max >= 0.0) {
            return Err(RecommendError::InvalidConfig(format!(
                "jitter_max must be non-negative, got {}",
                self.scoring.jitter_max
            )));
        }
        Ok(())
    }

    /// Slots per channel for a list of `top_n`: (content, collaborative)
    ///
    /// Integer truncation; the rest goes to discovery and backfill. The two
    /// quotas never add up to more than `top_n`, even for a config that
    /// hasn't been through [`validate`](Self::validate).
    pub fn quotas(&self, top_n: usize) -> (usize, usize) {
        let content = top_n * self.content_percent.min(100) / 100;
        let collaborative = (top_n * self.collaborative_percent / 100).min(top_n - content);
        (content, collaborative)
    }
}
