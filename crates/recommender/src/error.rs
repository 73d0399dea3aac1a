//! Errors reported by the recommendation core.

use data_loader::{DataLoadError, ItemId, ProfileId};
use thiserror::Error;

/// Errors that can occur when ranking or updating
///
/// An empty candidate pool is not an error: ranking just returns fewer
/// entries than requested.
#[derive(Error, Debug)]
pub enum RecommendError {
    /// No profile with this id in the collection
    #[error("Profile not found: {0}")]
    ProfileNotFound(ProfileId),

    /// No item with this id in the collection
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    /// Loading, saving or validating a collection failed
    #[error(transparent)]
    Data(#[from] DataLoadError),

    /// A configuration value is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, RecommendError>;
