//! Recommender crate for the article recommendation engine.
//!
//! This crate contains the assembler that combines the three ranking
//! channels into one list, the profile updater that applies feedback and
//! decay, and the configuration both read from.

pub mod assembler;
pub mod config;
pub mod error;
pub mod updater;

pub use assembler::{RecommendationAssembler, Recommendations};
pub use config::{DecayPolicy, RecommenderConfig};
pub use error::{RecommendError, Result};
pub use updater::{Interaction, InteractionOutcome, ProfileUpdater, WeightChange};
