//! # Data Loader Crate
//!
//! This crate handles loading, validating and saving the profile and
//! article collections the recommender works on.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Profile, Item) and id aliases
//! - **parser**: Parse JSON documents into validated records
//! - **store**: Whole-collection ProfileStore / ItemStore traits and JSON files
//! - **index**: The Catalog, both collections indexed and cross-checked
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Catalog;
//! use std::path::Path;
//!
//! let catalog = Catalog::load_from_files(
//!     Path::new("data/users.json"),
//!     Path::new("data/articles.json"),
//! )?;
//!
//! let profile = catalog.get_profile("user_0").unwrap();
//! println!("{} has read {} articles", profile.name, profile.history.len());
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod store;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use index::Catalog;
pub use store::{ItemStore, JsonItemStore, JsonProfileStore, ProfileStore};
pub use types::{
    // Type aliases
    ProfileId,
    ItemId,
    Tag,
    Level,
    // Core types
    Profile,
    Item,
    // Helpers
    round_weight,
    DEFAULT_MASTERY,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::default();
        let (profiles, items) = catalog.counts();

        assert_eq!(profiles, 0);
        assert_eq!(items, 0);
        assert!(catalog.get_profile("user_0").is_none());
        assert!(catalog.get_item("article_0").is_none());
    }

    #[test]
    fn test_profiles_mut_updates_in_place() {
        let mut catalog = Catalog::new(
            vec![Profile::new("user_0", "User0")],
            vec![Item::new("article_0", "Article0", vec!["Art".to_string()], 1)],
        )
        .unwrap();

        catalog.profiles_mut()[0].record_consumption("article_0");

        let (profiles, _items) = catalog.into_parts();
        assert_eq!(profiles[0].history, vec!["article_0".to_string()]);
    }
}
