//! Benchmarks for the ranking pass
//!
//! Run with: cargo bench --package recommender
//!
//! Uses an in-memory catalog of 500 profiles and 5000 articles.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::{round_weight, Item, Profile};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use recommender::{ProfileUpdater, RecommendationAssembler};
use sources::{NeighborFinder, ScoreCalculator};

const TAGS: [&str; 9] = [
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

fn load_test_data() -> (Vec<Profile>, Vec<Item>) {
    let mut rng = StdRng::seed_from_u64(2024);

    let items: Vec<Item> = (0..5000)
        .map(|i| {
            let tag = TAGS[rng.random_range(0..TAGS.len())];
            Item::new(
                format!("article_{}", i),
                format!("Article{}", i),
                vec![tag.to_string()],
                rng.random_range(1..=3),
            )
        })
        .collect();

    let profiles: Vec<Profile> = (0..500)
        .map(|u| {
            let mut profile = Profile::new(format!("user_{}", u), format!("User{}", u));
            for tag in TAGS {
                profile
                    .affinity
                    .insert(tag.to_string(), round_weight(rng.random_range(0.5..3.0)));
                profile.mastery.insert(tag.to_string(), rng.random_range(1..=3));
            }
            for _ in 0..20 {
                let id = &items[rng.random_range(0..items.len())].id;
                profile.record_consumption(id);
            }
            profile
        })
        .collect();

    (profiles, items)
}

fn bench_recommend(c: &mut Criterion) {
    let (profiles, items) = load_test_data();
    let assembler = RecommendationAssembler::default();
    let mut rng = StdRng::seed_from_u64(1);

    c.bench_function("recommend_top_10", |b| {
        b.iter(|| {
            let recs = assembler
                .recommend(black_box("user_42"), &profiles, &items, black_box(10), &mut rng)
                .unwrap();
            black_box(recs.entries)
        })
    });
}

fn bench_rank_unconsumed(c: &mut Criterion) {
    let (profiles, items) = load_test_data();
    let scorer = ScoreCalculator::new();
    let mut rng = StdRng::seed_from_u64(1);

    c.bench_function("rank_unconsumed", |b| {
        b.iter(|| {
            let ranked = scorer.rank_unconsumed(black_box(&profiles[0]), &items, &mut rng);
            black_box(ranked)
        })
    });
}

fn bench_find_useful_neighbor(c: &mut Criterion) {
    let (profiles, _items) = load_test_data();
    let finder = NeighborFinder::new();

    c.bench_function("find_useful_neighbor", |b| {
        b.iter(|| {
            let neighbor = finder.find_useful_neighbor(black_box(&profiles[7]), &profiles);
            black_box(neighbor.map(|n| n.distance))
        })
    });
}

fn bench_apply_decay(c: &mut Criterion) {
    let (profiles, _items) = load_test_data();
    let updater = ProfileUpdater::new();

    c.bench_function("apply_decay", |b| {
        b.iter(|| {
            let mut batch = profiles.clone();
            updater.apply_decay(black_box(&mut batch));
            black_box(batch)
        })
    });
}

criterion_group!(
    benches,
    bench_recommend,
    bench_rank_unconsumed,
    bench_find_useful_neighbor,
    bench_apply_decay
);
criterion_main!(benches);
