//! Synthetic profiles and articles for local runs.

use data_loader::{round_weight, Item, Profile};
use rand::seq::index;
use rand::Rng;

/// Topics every generated record draws from
pub const TAGS: [&str; 9] = [
    "Math",
    "Physique",
    "Psycho",
    "Medecine",
    "Histoire",
    "Geographie",
    "Geologie",
    "Informatique",
    "Art",
];

/// Profiles with a weight and a mastery level for every tag, nothing read yet
pub fn generate_profiles<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<Profile> {
    (0..count)
        .map(|i| {
            let mut profile = Profile::new(format!("user_{}", i), format!("User{}", i));
            for tag in TAGS {
                let weight = round_weight(rng.random_range(0.5..=3.0));
                profile.affinity.insert(tag.to_string(), weight);
                profile.mastery.insert(tag.to_string(), rng.random_range(1..=3));
            }
            profile
        })
        .collect()
}

/// Articles with one or two distinct tags and a level from 1 to 3
pub fn generate_items<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<Item> {
    (0..count)
        .map(|i| {
            let tag_count = rng.random_range(1..=2);
            let tags = index::sample(rng, TAGS.len(), tag_count)
                .into_iter()
                .map(|t| TAGS[t].to_string())
                .collect();
            let mut item = Item::new(
                format!("article_{}", i),
                format!("Article{}", i),
                tags,
                rng.random_range(1..=3),
            );
            item.content = Some(format!("Content{}", i));
            item
        })
        .collect()
}
