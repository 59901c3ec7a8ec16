use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rand::Rng;
use server::{
    RecommendError, Recommendation, RecommendationOrchestrator, RecommendationRequest,
    DEFAULT_RECOMMENDATIONS,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Maximum search results shown
const SEARCH_LIMIT: usize = 20;

/// movie-recs - item-to-item movie recommendations
#[derive(Parser)]
#[command(name = "movie-recs")]
#[command(about = "Content-based movie recommendations from precomputed feature vectors", long_about = None)]
struct Cli {
    /// Directory holding titles.txt, features.csv and metadata.jsonl
    #[arg(short, long, default_value = "models")]
    models_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get recommendations for a set of liked titles
    Recommend {
        /// A title the user liked (repeat for several)
        #[arg(long = "liked", required = true)]
        liked: Vec<String>,

        /// Number of recommendations to return
        #[arg(long, default_value_t = DEFAULT_RECOMMENDATIONS)]
        limit: usize,

        /// Neighbors fetched per liked title
        #[arg(long)]
        fan_out: Option<usize>,
    },

    /// Search for titles in the model (case-insensitive substring match)
    Search {
        #[arg(long)]
        title: String,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,

        /// Liked titles per request
        #[arg(long, default_value = "3")]
        seeds: usize,
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

    println!("Loading model artifacts from {}...", cli.models_dir.display());
    let start = Instant::now();
    let orchestrator = RecommendationOrchestrator::load(&cli.models_dir)
        .context("Failed to load recommendation artifacts")?;
    let (titles, feature_rows, metadata) = orchestrator.artifacts().counts();
    println!(
        "{} Loaded {} titles ({} feature rows, {} metadata rows) in {:?}",
        "✓".green(),
        titles,
        feature_rows,
        metadata,
        start.elapsed()
    );

    match cli.command {
        Commands::Recommend {
            liked,
            limit,
            fan_out,
        } => {
            let orchestrator = match fan_out {
                Some(fan_out) => orchestrator.with_fan_out(fan_out),
                None => orchestrator,
            };
            handle_recommend(&orchestrator, liked, limit)?
        }
        Commands::Search { title } => handle_search(&orchestrator, &title),
        Commands::Benchmark {
            requests,
            concurrent,
            seeds,
        } => handle_benchmark(Arc::new(orchestrator), requests, concurrent, seeds).await?,
    }

    Ok(())
}

/// Handle the 'recommend' command
fn handle_recommend(
    orchestrator: &RecommendationOrchestrator,
    liked: Vec<String>,
    limit: usize,
) -> Result<()> {
    for title in &liked {
        if orchestrator.artifacts().titles.position(title).is_none() {
            println!("{} '{}' is not in the model and will be skipped", "!".yellow(), title);
        }
    }

    let request = RecommendationRequest::new(liked, limit);
    match orchestrator.recommend(&request) {
        Ok(recommendations) => {
            print_recommendations(&recommendations);
            Ok(())
        }
        Err(RecommendError::EmptyResult) => {
            println!(
                "{}",
                "No recommendations found. Check the spelling of the titles; a user with no known titles is a cold-start user."
                    .yellow()
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Handle the 'search' command
fn handle_search(orchestrator: &RecommendationOrchestrator, query: &str) {
    let artifacts = orchestrator.artifacts();
    let matches = artifacts.titles.search(query);

    println!("{}", format!("Search results for '{}':", query).bold().blue());
    if matches.is_empty() {
        println!("  no matching titles");
        return;
    }

    for (position, title) in matches.iter().take(SEARCH_LIMIT) {
        let tmdb = artifacts
            .metadata
            .get(title)
            .and_then(|m| m.tmdb_id)
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{:>6}: {} (tmdbId {})", position, title, tmdb);
    }
    if matches.len() > SEARCH_LIMIT {
        println!("  ... and {} more", matches.len() - SEARCH_LIMIT);
    }
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    orchestrator: Arc<RecommendationOrchestrator>,
    requests: usize,
    concurrent: usize,
    seeds: usize,
) -> Result<()> {
    let all_titles = orchestrator.artifacts().titles.titles();
    if all_titles.is_empty() || requests == 0 {
        println!("Nothing to benchmark");
        return Ok(());
    }

    // Random liked titles for every request
    let mut rng = rand::rng();
    let batches: Vec<RecommendationRequest> = (0..requests)
        .map(|_| {
            let liked: Vec<String> = (0..seeds.max(1))
                .map(|_| all_titles[rng.random_range(0..all_titles.len())].clone())
                .collect();
            RecommendationRequest::new(liked, DEFAULT_RECOMMENDATIONS)
        })
        .collect();

    let wall_start = Instant::now();
    let mut timings: Vec<Duration> = Vec::with_capacity(requests);
    let mut empty = 0usize;

    for chunk in batches.chunks(concurrent.max(1)) {
        let mut handles = Vec::with_capacity(chunk.len());
        for request in chunk.iter().cloned() {
            let orchestrator = orchestrator.clone();
            handles.push(tokio::task::spawn_blocking(move || {
                let start = Instant::now();
                let outcome = orchestrator.recommend(&request);
                (start.elapsed(), outcome)
            }));
        }

        for handle in handles {
            let (elapsed, outcome) = handle.await?;
            match outcome {
                Ok(recs) => debug!("{} recommendations in {:?}", recs.len(), elapsed),
                Err(RecommendError::EmptyResult) => empty += 1,
                Err(e) => return Err(e.into()),
            }
            timings.push(elapsed);
        }
    }
    let wall_time = wall_start.elapsed();

    timings.sort();
    let total: Duration = timings.iter().sum();
    let avg_latency = total / timings.len() as u32;
    let percentile = |p: f64| {
        let index = ((timings.len() as f64 * p) as usize).min(timings.len() - 1);
        timings[index]
    };
    let throughput = timings.len() as f64 / wall_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {} ({} concurrent, {} seeds each)", timings.len(), concurrent, seeds);
    println!("Empty results: {}", empty);
    println!("Total time: {:?}", wall_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Format and print recommendations
fn print_recommendations(recommendations: &[Recommendation]) {
    println!("{}", "Movie Recommendations:".bold().blue());
    for (i, rec) in recommendations.iter().enumerate() {
        let tmdb = rec
            .tmdb_id
            .map(|id| format!(" tmdbId {}", id))
            .unwrap_or_default();
        println!(
            "{}. {} - similarity {:.4}{}",
            (i + 1).to_string().green(),
            rec.title.bold(),
            rec.similarity,
            tmdb
        );
        if !rec.genres.is_empty() {
            println!("   Genres: {}", rec.genres);
        }
        if !rec.cast.is_empty() {
            println!("   Cast: {}", rec.cast);
        }
        if let Some(overview) = &rec.overview {
            println!("   {}", overview.dimmed());
        }
    }
}
