mod generate;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{Catalog, Item, JsonItemStore, JsonProfileStore, Profile, ProfileStore};
use rand::rngs::StdRng;
use rand::SeedableRng;
use recommender::{Interaction, ProfileUpdater, RecommendationAssembler, RecommenderConfig};
use sources::{EntrySource, RankedEntry};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// ArticleRecs - Article Recommendation Engine
#[derive(Parser)]
#[command(name = "article-recs")]
#[command(about = "Article recommendation engine using tag affinity and collaborative filtering", long_about = None)]
struct Cli {
    /// Path to the profiles JSON file
    #[arg(long, global = true, default_value = "data/users.json")]
    profiles: PathBuf,

    /// Path to the articles JSON file
    #[arg(long, global = true, default_value = "data/articles.json")]
    items: PathBuf,

    /// Optional JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get article recommendations for a profile
    Recommend {
        /// Profile ID to get recommendations for
        #[arg(long)]
        profile_id: String,

        /// Number of recommendations to return (defaults to the config's top_n)
        #[arg(long)]
        limit: Option<usize>,

        /// Show why each article was picked
        #[arg(long)]
        explain: bool,
    },

    /// Record a read, like or quiz on an article and save the profiles
    Interact {
        #[arg(long)]
        profile_id: String,

        #[arg(long)]
        item_id: String,

        /// One of read, like, quiz
        #[arg(long)]
        kind: Interaction,
    },

    /// Decay every profile's weights and save the profiles
    Decay {
        #[arg(long)]
        factor: Option<f64>,

        #[arg(long)]
        floor: Option<f64>,
    },

    /// Show the nearest peer with unread articles to offer
    Neighbor {
        #[arg(long)]
        profile_id: String,
    },

    /// Show a profile's weights, mastery and history
    Profile {
        #[arg(long)]
        profile_id: String,
    },

    /// Search for articles by title
    Search {
        /// Title to search for (case-insensitive substring match)
        #[arg(long)]
        title: String,
    },

    /// Write synthetic profiles and articles to the data paths
    Generate {
        #[arg(long, default_value = "10")]
        profile_count: usize,

        #[arg(long, default_value = "200")]
        item_count: usize,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => RecommenderConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => RecommenderConfig::default(),
    };
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let profiles_path = cli.profiles.as_path();
    let items_path = cli.items.as_path();

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend {
            profile_id,
            limit,
            explain,
        } => {
            let catalog = load_catalog(profiles_path, items_path)?;
            handle_recommend(&catalog, config, &profile_id, limit, explain, &mut rng)?
        }
        Commands::Interact {
            profile_id,
            item_id,
            kind,
        } => {
            let catalog = load_catalog(profiles_path, items_path)?;
            handle_interact(catalog, profiles_path, &profile_id, &item_id, kind)?
        }
        Commands::Decay { factor, floor } => {
            let catalog = load_catalog(profiles_path, items_path)?;
            handle_decay(catalog, profiles_path, config, factor, floor)?
        }
        Commands::Neighbor { profile_id } => {
            let catalog = load_catalog(profiles_path, items_path)?;
            handle_neighbor(&catalog, config, &profile_id)?
        }
        Commands::Profile { profile_id } => {
            let catalog = load_catalog(profiles_path, items_path)?;
            handle_profile(&catalog, &profile_id)?
        }
        Commands::Search { title } => {
            let catalog = load_catalog(profiles_path, items_path)?;
            handle_search(&catalog, &title)?
        }
        Commands::Generate {
            profile_count,
            item_count,
        } => handle_generate(profiles_path, items_path, profile_count, item_count, &mut rng)?,
    }

    Ok(())
}

/// Load and validate both collections
fn load_catalog(profiles_path: &Path, items_path: &Path) -> Result<Catalog> {
    println!(
        "Loading profiles from {} and articles from {}...",
        profiles_path.display(),
        items_path.display()
    );
    let start = Instant::now();
    let catalog = Catalog::load_from_files(profiles_path, items_path)
        .context("Failed to load profiles and articles")?;
    let (profile_count, item_count) = catalog.counts();
    println!(
        "{} Loaded {} profiles and {} articles in {:?}",
        "✓".green(),
        profile_count,
        item_count,
        start.elapsed()
    );
    Ok(catalog)
}

/// Handle the 'recommend' command
fn handle_recommend(
    catalog: &Catalog,
    config: RecommenderConfig,
    profile_id: &str,
    limit: Option<usize>,
    explain: bool,
    rng: &mut StdRng,
) -> Result<()> {
    let limit = limit.unwrap_or(config.top_n);
    let assembler = RecommendationAssembler::new(config);

    let start = Instant::now();
    let recommendations = assembler
        .recommend(profile_id, catalog.profiles(), catalog.items(), limit, rng)
        .with_context(|| format!("Failed to build recommendations for {}", profile_id))?;
    info!("Ranking took {:?}", start.elapsed());

    let profile = recommendations.profile;
    println!(
        "{}",
        format!("Recommendations for {} ({})", profile.name, profile.id).bold().blue()
    );
    print_top_interests(profile);

    if recommendations.entries.is_empty() {
        println!("{} No recommendations (everything read?)", "✗".red());
        return Ok(());
    }
    print_recommendations(profile, &recommendations.entries, explain);
    println!(
        "\nTip: '{}' is the top pick.",
        recommendations.entries[0].item_id.cyan()
    );
    Ok(())
}

/// Handle the 'interact' command
fn handle_interact(
    catalog: Catalog,
    profiles_path: &Path,
    profile_id: &str,
    item_id: &str,
    kind: Interaction,
) -> Result<()> {
    let (mut profiles, items) = catalog.into_parts();
    let updater = ProfileUpdater::new();

    let outcome = updater
        .record_interaction(&mut profiles, &items, profile_id, item_id, kind)
        .with_context(|| format!("Failed to record {} of {} by {}", kind, item_id, profile_id))?;

    println!(
        "{}",
        format!("[{}] {} on {}", kind.as_str().to_uppercase(), profile_id, item_id).bold().blue()
    );
    for change in &outcome.changes {
        println!(
            "   -> Weight '{}': {} {} {}",
            change.tag,
            change.old,
            "→".green(),
            change.new
        );
    }
    if kind == Interaction::Read {
        if outcome.added_to_history {
            println!("   -> Added to reading history.");
        } else {
            println!("   -> Already in reading history (no duplicate).");
        }
    }

    save_profiles(&JsonProfileStore::new(profiles_path), &profiles)?;
    println!("{} Saved {} profiles", "✓".green(), profiles.len());
    Ok(())
}

/// Handle the 'decay' command
fn handle_decay(
    catalog: Catalog,
    profiles_path: &Path,
    mut config: RecommenderConfig,
    factor: Option<f64>,
    floor: Option<f64>,
) -> Result<()> {
    if let Some(factor) = factor {
        config.decay.factor = factor;
    }
    if let Some(floor) = floor {
        config.decay.floor = floor;
    }
    config.validate().context("Invalid decay settings")?;

    let (mut profiles, _items) = catalog.into_parts();
    ProfileUpdater::new()
        .with_decay(config.decay)
        .apply_decay(&mut profiles);

    save_profiles(&JsonProfileStore::new(profiles_path), &profiles)?;
    println!(
        "{} Decayed {} profiles (factor {}, floor {})",
        "✓".green(),
        profiles.len(),
        config.decay.factor,
        config.decay.floor
    );
    Ok(())
}

/// Handle the 'neighbor' command
fn handle_neighbor(catalog: &Catalog, config: RecommenderConfig, profile_id: &str) -> Result<()> {
    let assembler = RecommendationAssembler::new(config);
    let neighbor = assembler
        .find_useful_neighbor(profile_id, catalog.profiles())
        .with_context(|| format!("Failed to look up neighbors of {}", profile_id))?;

    let Some(neighbor) = neighbor else {
        println!("{} No peer of {} has unread articles to offer", "✗".red(), profile_id);
        return Ok(());
    };

    println!(
        "{}",
        format!("Nearest useful neighbor of {}: {}", profile_id, neighbor.profile.id).bold().blue()
    );
    println!("{}Distance: {:.3}", "• ".green(), neighbor.distance);
    println!("{}New articles: {}", "• ".green(), neighbor.new_items.len());
    for item_id in &neighbor.new_items {
        match catalog.get_item(item_id) {
            Some(item) => println!("  - {} {} [{}]", item.id, item.title, item.tags.join(", ")),
            None => println!("  - {}", item_id),
        }
    }
    Ok(())
}

/// Handle the 'profile' command
fn handle_profile(catalog: &Catalog, profile_id: &str) -> Result<()> {
    let profile = catalog
        .get_profile(profile_id)
        .ok_or_else(|| anyhow!("Profile {} not found", profile_id))?;

    println!("{}", format!("Profile: {} ({})", profile.name, profile.id).bold().blue());

    println!("Weights:");
    for (tag, weight) in profile.top_interests(profile.affinity.len()) {
        println!("  {}{:<14} {:.2}", "• ".green(), tag, weight);
    }

    println!("Mastery:");
    for (tag, level) in &profile.mastery {
        println!("  {}{:<14} {}", "• ".cyan(), tag, level);
    }

    println!("History ({} articles):", profile.history.len());
    for item_id in &profile.history {
        match catalog.get_item(item_id) {
            Some(item) => println!("  - {} {} [{}]", item.id, item.title, item.tags.join(", ")),
            None => println!("  - {}", item_id),
        }
    }
    Ok(())
}

/// Handle the 'search' command
fn handle_search(catalog: &Catalog, title: &str) -> Result<()> {
    let title_lower = title.to_lowercase();

    // (relevance, item): 0 for an exact title, 1 for a substring match
    let mut matches: Vec<(u8, &Item)> = catalog
        .items()
        .iter()
        .filter_map(|item| {
            let item_title = item.title.to_lowercase();
            if item_title == title_lower {
                Some((0, item))
            } else if item_title.contains(&title_lower) {
                Some((1, item))
            } else {
                None
            }
        })
        .collect();
    matches.sort_by_key(|(relevance, _)| *relevance);

    println!("{}", format!("Search results for '{}':", title).bold().blue());
    if matches.is_empty() {
        println!("  (no match)");
    }
    for (_, item) in matches.iter().take(20) {
        println!(
            "{}: {} [{}] level {}",
            item.id,
            item.title,
            item.tags.join(", "),
            item.level
        );
    }
    Ok(())
}

/// Handle the 'generate' command
fn handle_generate(
    profiles_path: &Path,
    items_path: &Path,
    profile_count: usize,
    item_count: usize,
    rng: &mut StdRng,
) -> Result<()> {
    let profiles = generate::generate_profiles(profile_count, rng);
    let items = generate::generate_items(item_count, rng);

    save_profiles(&JsonProfileStore::new(profiles_path), &profiles)?;
    let item_store = JsonItemStore::new(items_path);
    item_store
        .save(&items)
        .with_context(|| format!("Failed to write {}", item_store.path().display()))?;

    println!(
        "{} Generated {} profiles in {} and {} articles in {}",
        "✓".green(),
        profiles.len(),
        profiles_path.display(),
        items.len(),
        items_path.display()
    );
    Ok(())
}

/// Write the whole profile collection back
fn save_profiles(store: &JsonProfileStore, profiles: &[Profile]) -> Result<()> {
    store
        .save(profiles)
        .with_context(|| format!("Failed to save profiles to {}", store.path().display()))
}

fn print_top_interests(profile: &Profile) {
    let interests = profile
        .top_interests(5)
        .into_iter()
        .map(|(tag, weight)| format!("{} ({:.2})", tag, weight))
        .collect::<Vec<_>>()
        .join(" | ");
    println!("Top interests: {}", interests);
}

/// Print the list as a table
fn print_recommendations(profile: &Profile, entries: &[RankedEntry], explain: bool) {
    println!(
        "\n   {:<8} | {:<5} | {:<25} | {:<14} | {}",
        "SCORE", "LEVEL", "TITLE", "SOURCE", "TAGS"
    );
    println!("   {}", "-".repeat(72));

    for (i, entry) in entries.iter().enumerate() {
        let title: String = entry.title.chars().take(25).collect();
        let source = match entry.source {
            EntrySource::Content => entry.source.as_str().normal(),
            EntrySource::Collaborative => entry.source.as_str().yellow(),
            EntrySource::Discovery => entry.source.as_str().magenta(),
        };
        println!(
            "{}. {:<8.2} | {:<5} | {:<25} | {:<14} | {}",
            (i + 1).to_string().green(),
            entry.score,
            entry.level,
            title,
            source,
            entry.tags.join(", ")
        );
        if explain {
            println!("      {}", explain_entry(profile, entry));
        }
    }
}

fn explain_entry(profile: &Profile, entry: &RankedEntry) -> String {
    let affinity: f64 = entry.tags.iter().map(|tag| profile.affinity_for(tag)).sum();
    let mastery = entry
        .tags
        .first()
        .map(|tag| profile.mastery_for(tag))
        .unwrap_or(data_loader::DEFAULT_MASTERY);
    let reason = match entry.source {
        EntrySource::Content => "matches your interests",
        EntrySource::Collaborative => "read by the reader closest to you",
        EntrySource::Discovery => "a topic you rarely read",
    };
    format!(
        "{}: tag affinity {:.2}, level {} vs mastery {}",
        reason, affinity, entry.level, mastery
    )
}
