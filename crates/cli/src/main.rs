use anyhow::{anyhow, Context, Result};
use catalog::{Catalog, CatalogStore, ProductRecord};
use clap::{Parser, Subcommand};
use colored::Colorize;
use enrichment::{first_image_url, normalize_price, NormalizedProduct};
use futures::stream::{self, StreamExt};
use server::{Config, RecommendationOrchestrator, ServiceContext};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::debug;

const DEFAULT_CATALOG_PATH: &str = "../products.jsonl";

/// product-recs - Semantic product recommendations from the command line
#[derive(Parser)]
#[command(name = "product-recs")]
#[command(about = "Product recommendations backed by semantic search and generated copy", long_about = None)]
struct Cli {
    /// Path to the catalog snapshot (defaults to $CATALOG_PATH, then ../products.jsonl)
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get product recommendations for a free-text query
    Recommend {
        /// What the shopper is looking for
        #[arg(long)]
        query: String,

        /// Show the raw catalog fields behind each product
        #[arg(long)]
        explain: bool,
    },

    /// Show one catalog record and its normalized fields
    Product {
        #[arg(long)]
        id: String,
    },

    /// Search the catalog by title
    Search {
        /// Text to look for (case-insensitive substring match)
        #[arg(long)]
        title: String,

        /// Maximum number of results
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "50")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "5")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_file = server::config::load_env_file()?;
    server::init_tracing();
    if let Some(path) = env_file {
        debug!("Loaded environment from {}", path.display());
    }

    let cli = Cli::parse();
    let catalog_path = cli
        .catalog
        .or_else(|| std::env::var_os("CATALOG_PATH").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH));

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend { query, explain } => {
            let orchestrator = build_orchestrator(catalog_path)?;
            handle_recommend(&orchestrator, &query, explain).await?
        }
        Commands::Product { id } => handle_product(&load_catalog(&catalog_path)?, &id)?,
        Commands::Search { title, limit } => {
            handle_search(&load_catalog(&catalog_path)?, &title, limit)
        }
        Commands::Benchmark {
            requests,
            concurrent,
        } => {
            let orchestrator = build_orchestrator(catalog_path)?;
            handle_benchmark(&orchestrator, requests, concurrent).await?
        }
    }

    Ok(())
}

/// Load the snapshot directly; lookups don't need the AI services
fn load_catalog(path: &Path) -> Result<Catalog> {
    println!("Loading catalog from {}...", path.display());
    let start = Instant::now();
    let catalog = Catalog::load_from_file(path).context("Failed to load product catalog")?;
    println!(
        "{} Loaded {} products in {:?}",
        "✓".green(),
        catalog.len(),
        start.elapsed()
    );
    Ok(catalog)
}

/// Same wiring as the server, with the catalog path from the command line
fn build_orchestrator(catalog_path: PathBuf) -> Result<RecommendationOrchestrator> {
    let mut config = Config::from_env().context("Invalid configuration")?;
    config.catalog_path = catalog_path;

    let catalog = CatalogStore::ready(load_catalog(&config.catalog_path)?);
    let context = ServiceContext::with_catalog(config, catalog)?;
    Ok(context.orchestrator().clone())
}

/// Handle the 'recommend' command
async fn handle_recommend(
    orchestrator: &RecommendationOrchestrator,
    query: &str,
    explain: bool,
) -> Result<()> {
    let start = Instant::now();
    let products = orchestrator.recommend(query).await?;
    debug!("Recommendation took {:?}", start.elapsed());

    if products.is_empty() {
        println!("{}", format!("No products found for '{}'", query).yellow());
        return Ok(());
    }

    print_products(&products);

    if explain {
        let catalog = orchestrator.catalog().catalog()?;
        println!("{}", "Raw catalog fields:".bold().blue());
        for product in &products {
            if let Some(record) = catalog.get(&product.id) {
                println!(
                    "  {}: price={:?} images={:?}",
                    product.id, record.price, record.images
                );
            }
        }
    }
    Ok(())
}

/// Handle the 'product' command
fn handle_product(catalog: &Catalog, id: &str) -> Result<()> {
    let record = catalog
        .get(id)
        .ok_or_else(|| anyhow!("Product {} not found", id))?;

    println!("{}", format!("Product ID: {}", record.id).bold().blue());
    println!("{}Title: {}", "• ".green(), record.title);
    println!("{}Price: {:.2}", "• ".green(), normalize_price(record.price.as_ref()));
    println!("{}Image: {}", "• ".green(), first_image_url(record.images.as_ref()));
    println!("{}Raw price: {:?}", "• ".cyan(), record.price);
    println!("{}Raw images: {:?}", "• ".cyan(), record.images);

    if !record.attributes.is_empty() {
        println!("Other attributes:");
        for (key, value) in &record.attributes {
            println!("  - {}: {}", key, compact(value));
        }
    }
    Ok(())
}

/// Handle the 'search' command
fn handle_search(catalog: &Catalog, title: &str, limit: usize) {
    let matches: Vec<&ProductRecord> = catalog.search_titles(title, limit);

    println!("{}", format!("Search results for '{}':", title).bold().blue());
    if matches.is_empty() {
        println!("  (no matches)");
    }
    for record in matches {
        println!(
            "{}: {} - ${:.2}",
            record.id,
            record.title,
            normalize_price(record.price.as_ref())
        );
    }
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    orchestrator: &RecommendationOrchestrator,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    let catalog = orchestrator.catalog().catalog()?;
    if catalog.is_empty() {
        return Err(anyhow!("Catalog is empty, nothing to sample queries from"));
    }
    if requests == 0 {
        return Err(anyhow!("--requests must be at least 1"));
    }

    // Sample queries from catalog titles
    let titles: Vec<String> = catalog.iter().map(|r| r.title.clone()).collect();
    let queries: Vec<String> = (0..requests)
        .map(|_| titles[rand::random_range(0..titles.len())].clone())
        .collect();

    println!(
        "Running {} requests with {} in flight...",
        requests,
        concurrent.max(1)
    );
    let wall_clock = Instant::now();

    let outcomes: Vec<(Duration, bool)> = stream::iter(queries)
        .map(|query| {
            let orchestrator = orchestrator.clone();
            async move {
                let start = Instant::now();
                let ok = orchestrator.recommend(&query).await.is_ok();
                (start.elapsed(), ok)
            }
        })
        .buffer_unordered(concurrent.max(1))
        .collect()
        .await;

    let total_time = wall_clock.elapsed();
    let failures = outcomes.iter().filter(|(_, ok)| !ok).count();
    let mut timings: Vec<Duration> = outcomes.into_iter().map(|(elapsed, _)| elapsed).collect();
    timings.sort();

    let avg_latency = timings.iter().sum::<Duration>() / timings.len() as u32;
    let throughput = requests as f64 / total_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Total time: {:?}", total_time);
    println!("Failed requests: {}", failures);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(&timings, 0.50));
    println!("P95 latency: {:?}", percentile(&timings, 0.95));
    println!("P99 latency: {:?}", percentile(&timings, 0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Nearest-rank percentile over sorted, non-empty timings
fn percentile(sorted: &[Duration], p: f64) -> Duration {
    let rank = (sorted.len() as f64 * p) as usize;
    sorted[rank.min(sorted.len() - 1)]
}

fn compact(value: &serde_json::Value) -> String {
    let text = match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    if text.chars().count() > 80 {
        format!("{}...", text.chars().take(77).collect::<String>())
    } else {
        text
    }
}

/// Helper function to format and print products
fn print_products(products: &[NormalizedProduct]) {
    println!("{}", "Recommended Products:".bold().blue());
    for (i, product) in products.iter().enumerate() {
        println!(
            "{}. {} [{}] - ${:.2}",
            (i + 1).to_string().green(),
            product.title,
            product.id,
            product.price
        );
        println!("   {}", product.image.dimmed());
        println!("   {}", product.description);
    }
}
