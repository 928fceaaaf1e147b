use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use data_loader::{join_genres, Catalog, Genre, ReleaseYear};
use pipeline::{
    GenreLexicon, PreferenceQuery, Recommendation, Recommender, ScoringWeights, DEFAULT_K,
    DEFAULT_MIN_RATINGS,
};
use server::{AppState, RecommendationOrchestrator};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::info;

/// ReelRecs - Preference-based Movie Recommendations
#[derive(Parser)]
#[command(name = "reel-recs")]
#[command(about = "Recommend movies from free-text preferences", long_about = None)]
struct Cli {
    /// Path to MovieLens dataset directory (ml-100k or ml-1m layout)
    #[arg(short, long, env = "REEL_RECS_DATA_DIR", default_value = "data/ml-100k")]
    data_dir: PathBuf,

    /// TOML file with extra or replacement genre phrases
    #[arg(long, env = "REEL_RECS_LEXICON")]
    lexicon: Option<PathBuf>,

    #[command(flatten)]
    weights: WeightArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Scoring overrides; anything left unset keeps its default
#[derive(Args)]
struct WeightArgs {
    /// Overlap used when the text names no genre
    #[arg(long, global = true)]
    baseline_overlap: Option<f32>,

    /// Quality used for movies nobody rated
    #[arg(long, global = true)]
    neutral_quality: Option<f32>,

    /// Size of the popularity bonus relative to the genre/quality score
    #[arg(long, global = true)]
    popularity_weight: Option<f32>,

    /// Rating count at which popularity stops growing
    #[arg(long, global = true)]
    popularity_saturation: Option<u32>,
}

impl WeightArgs {
    fn to_weights(&self) -> ScoringWeights {
        let defaults = ScoringWeights::default();
        ScoringWeights {
            baseline_overlap: self.baseline_overlap.unwrap_or(defaults.baseline_overlap),
            neutral_quality: self.neutral_quality.unwrap_or(defaults.neutral_quality),
            popularity_weight: self.popularity_weight.unwrap_or(defaults.popularity_weight),
            popularity_saturation: self
                .popularity_saturation
                .unwrap_or(defaults.popularity_saturation),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Get movie recommendations for a description of your taste
    Recommend {
        /// What you feel like watching, e.g. "a funny space adventure"
        #[arg(long)]
        preferences: String,

        /// Number of recommendations to return
        #[arg(long, default_value_t = DEFAULT_K)]
        limit: usize,

        /// Only consider movies with at least this many ratings
        #[arg(long)]
        min_ratings: Option<u32>,

        /// Show detailed explanation for each recommendation
        #[arg(long)]
        explain: bool,
    },

    /// Show the best-rated movies
    TopRated {
        #[arg(long, default_value_t = DEFAULT_K)]
        limit: usize,

        #[arg(long, default_value_t = DEFAULT_MIN_RATINGS)]
        min_ratings: u32,
    },

    /// Show dataset statistics
    Stats,

    /// List the most-rated movies, optionally for one genre
    Movies {
        /// Genre name, e.g. "Sci-Fi" or "western"
        #[arg(long)]
        genre: Option<String>,

        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Serve the HTTP API
    Serve {
        #[arg(long, env = "REEL_RECS_HOST", default_value = "127.0.0.1")]
        host: String,

        #[arg(long, env = "REEL_RECS_PORT", default_value = "5002")]
        port: u16,

        /// Cap on `k` and `limit` per request
        #[arg(long, default_value_t = server::api::DEFAULT_MAX_K)]
        max_k: usize,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Load the catalog (this may take a moment)
    println!("Loading MovieLens dataset from {}...", cli.data_dir.display());
    let start = Instant::now();
    let (catalog, report) = Catalog::load_from_dir(&cli.data_dir)
        .with_context(|| format!("Failed to load dataset from {}", cli.data_dir.display()))?;
    println!(
        "{} Loaded {} movies and {} ratings in {:?}",
        "✓".green(),
        catalog.len(),
        catalog.total_ratings(),
        start.elapsed()
    );
    if report.skipped() > 0 {
        println!(
            "{} Skipped {} malformed rows (see log for details)",
            "!".yellow(),
            report.skipped()
        );
    }

    let mut recommender = Recommender::new(Arc::new(catalog)).with_weights(cli.weights.to_weights());
    if let Some(path) = &cli.lexicon {
        let lexicon = GenreLexicon::from_toml_file(path)
            .with_context(|| format!("Failed to load lexicon from {}", path.display()))?;
        info!("Loaded {} lexicon phrases from {}", lexicon.len(), path.display());
        recommender = recommender.with_lexicon(Arc::new(lexicon));
    }
    let orchestrator = RecommendationOrchestrator::new(recommender, &report);

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend {
            preferences,
            limit,
            min_ratings,
            explain,
        } => handle_recommend(&orchestrator, preferences, limit, min_ratings, explain).await?,
        Commands::TopRated { limit, min_ratings } => {
            handle_top_rated(&orchestrator, limit, min_ratings).await?
        }
        Commands::Stats => handle_stats(&orchestrator),
        Commands::Movies { genre, limit } => handle_movies(&orchestrator, genre, limit)?,
        Commands::Serve { host, port, max_k } => {
            handle_serve(orchestrator, &host, port, max_k).await?
        }
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(orchestrator, requests, concurrent).await?,
    }

    Ok(())
}

/// Handle the 'recommend' command
async fn handle_recommend(
    orchestrator: &RecommendationOrchestrator,
    preferences: String,
    limit: usize,
    min_ratings: Option<u32>,
    explain: bool,
) -> Result<()> {
    let mut query = PreferenceQuery::new(preferences.clone()).with_k(limit);
    if let Some(min_ratings) = min_ratings {
        query = query.with_min_ratings(min_ratings);
    }
    let result = orchestrator.get_recommendations(query).await?;

    if result.is_empty() {
        println!("{}", empty_result_hint(&preferences, limit).yellow());
        return Ok(());
    }

    if explain {
        let interpretation = orchestrator.recommender().interpreter().interpret_detailed(&preferences);
        if interpretation.is_empty() {
            println!("No genre keywords recognized; ranking by popularity and quality.");
        } else {
            println!(
                "Understood: {} (from {})",
                join_genres(&interpretation.genres).bold(),
                interpretation.matched_phrases.join(", ")
            );
        }
    }

    print_recommendations("Movie Recommendations:", &result.recommendations, explain);
    Ok(())
}

/// Why a recommend call came back with nothing
fn empty_result_hint(preferences: &str, limit: usize) -> &'static str {
    if preferences.trim().is_empty() {
        "Tell me what you'd like to watch to get recommendations."
    } else if limit == 0 {
        "Nothing to show with --limit 0."
    } else {
        "No movies have enough ratings; try a lower --min-ratings."
    }
}

/// Handle the 'top-rated' command
async fn handle_top_rated(
    orchestrator: &RecommendationOrchestrator,
    limit: usize,
    min_ratings: u32,
) -> Result<()> {
    let top = orchestrator.get_top_rated(limit, min_ratings).await?;
    let header = format!("Top Rated (at least {} ratings):", min_ratings);
    print_recommendations(&header, &top, true);
    Ok(())
}

/// Handle the 'stats' command
fn handle_stats(orchestrator: &RecommendationOrchestrator) {
    let stats = orchestrator.stats();

    println!("{}", "Dataset Statistics:".bold().blue());
    println!("{}Movies: {}", "• ".green(), stats.total_movies);
    println!("{}Ratings: {}", "• ".green(), stats.total_ratings);
    println!("{}Users: {}", "• ".green(), stats.total_users);
    match stats.avg_rating {
        Some(avg) => println!("{}Average rating: {:.2}", "• ".green(), avg),
        None => println!("{}Average rating: n/a", "• ".green()),
    }
    println!("{}Skipped rows: {}", "• ".cyan(), stats.skipped_rows);

    println!("Movies per genre:");
    for count in &stats.genre_counts {
        println!("  - {}: {}", count.genre, count.count);
    }
}

/// Handle the 'movies' command
fn handle_movies(
    orchestrator: &RecommendationOrchestrator,
    genre: Option<String>,
    limit: usize,
) -> Result<()> {
    let genre = match genre {
        Some(label) => Some(Genre::from_label(&label).ok_or_else(|| {
            anyhow!(
                "Unknown genre '{}'. Known genres: {}",
                label,
                join_genres(&Genre::ALL)
            )
        })?),
        None => None,
    };

    let header = match genre {
        Some(genre) => format!("Most rated {} movies:", genre),
        None => "Most rated movies:".to_string(),
    };
    println!("{}", header.bold().blue());

    for (rank, movie) in orchestrator.list_movies(genre, limit).iter().enumerate() {
        println!(
            "{}. {} ({}) [{}] {}",
            (rank + 1).to_string().green(),
            movie.title,
            format_year(movie.year),
            join_genres(&movie.genres),
            format_ratings(movie.mean_rating, movie.rating_count)
        );
    }
    Ok(())
}

/// Handle the 'serve' command
async fn handle_serve(
    orchestrator: RecommendationOrchestrator,
    host: &str,
    port: u16,
    max_k: usize,
) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", host, port))?;

    let state = AppState::new(orchestrator).with_max_k(max_k);
    server::serve(addr, state).await
}

/// Sample preferences for the benchmark, from specific to vague
const BENCHMARK_PREFERENCES: &[&str] = &[
    "I love sci-fi movies",
    "something funny and lighthearted",
    "a dark crime thriller with a heist",
    "animated films for the kids",
    "romantic comedy",
    "epic war drama",
    "scary horror movies",
    "classic westerns",
    "a documentary about music",
    "surprise me",
];

/// Handle the 'benchmark' command
async fn handle_benchmark(
    orchestrator: RecommendationOrchestrator,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    if requests == 0 {
        return Err(anyhow!("--requests must be at least 1"));
    }
    let permits = Arc::new(Semaphore::new(concurrent.max(1)));

    // Pick a random preference for each request
    let queries: Vec<&'static str> = (0..requests)
        .map(|_| BENCHMARK_PREFERENCES[rand::random::<u32>() as usize % BENCHMARK_PREFERENCES.len()])
        .collect();

    // Use tokio::spawn to make concurrent requests
    let wall_start = Instant::now();
    let mut handles = vec![];
    for text in queries {
        let orchestrator = orchestrator.clone();
        let permits = Arc::clone(&permits);
        let handle = tokio::spawn(async move {
            let _permit = permits.acquire_owned().await?;
            let start = Instant::now();
            orchestrator
                .get_recommendations(PreferenceQuery::new(text).with_k(DEFAULT_K))
                .await?;
            Ok::<_, anyhow::Error>(start.elapsed())
        });
        handles.push(handle);
    }

    // Wait for all tasks to complete and collect timings
    let mut timings: Vec<Duration> = Vec::with_capacity(requests);
    for handle in handles {
        let elapsed = handle.await??;
        timings.push(elapsed);
    }
    let wall_time = wall_start.elapsed();

    let total_latency: Duration = timings.iter().sum();
    let avg_latency = total_latency / (timings.len() as u32);
    timings.sort();
    let percentile = |p: f32| timings[((timings.len() as f32 * p) as usize).min(timings.len() - 1)];
    let throughput = requests as f64 / wall_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {} ({} concurrent)", requests, concurrent.max(1));
    println!("Total time: {:?}", wall_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

fn format_year(year: Option<ReleaseYear>) -> String {
    match year {
        Some(ReleaseYear::Known(year)) => year.to_string(),
        _ => "????".to_string(),
    }
}

fn format_ratings(mean: Option<f32>, count: u32) -> String {
    match mean {
        Some(mean) => format!("avg {:.2} ({} ratings)", mean, count),
        None => "(no ratings)".to_string(),
    }
}

/// Helper function to format and print recommendations
fn print_recommendations(header: &str, recommendations: &[Recommendation], explain: bool) {
    println!("{}", header.bold().blue());
    for (rank, rec) in recommendations.iter().enumerate() {
        println!(
            "{}. {} ({}) [{}] - Score: {:.3}",
            (rank + 1).to_string().green(),
            rec.title,
            format_year(rec.year),
            join_genres(&rec.genres),
            rec.score
        );
        if explain {
            println!("   {}", rec.reason);
            println!(
                "   {} | {}",
                rec.description.dimmed(),
                format_ratings(rec.mean_rating, rec.rating_count)
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result_hint() {
        assert!(empty_result_hint("   ", 5).starts_with("Tell me"));
        assert!(empty_result_hint("", 0).starts_with("Tell me"));
        assert!(empty_result_hint("westerns", 0).contains("--limit 0"));
        assert!(empty_result_hint("westerns", 5).contains("--min-ratings"));
    }

    #[test]
    fn test_format_year() {
        assert_eq!(format_year(Some(ReleaseYear::Known(1977))), "1977");
    }
}
