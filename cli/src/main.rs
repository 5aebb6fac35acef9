//! Interactive semantic product search.
//!
//! One run: reconcile the vector cache against the dataset, prompt for a
//! single free-text query, print the ranked matches, exit. Exit code 0 on
//! a normal run, non-zero on dataset/cache/provider failures.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use semsearch_embeddings::GeminiProvider;
use semsearch_retrieval::{SearchConfig, SearchEngine};

#[derive(Debug, Parser)]
#[command(name = "semsearch", about = "Semantic product search over a CSV dataset")]
struct Cli {
    /// Product dataset CSV.
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Vector cache file.
    #[arg(long)]
    cache: Option<PathBuf>,

    /// Embedding model name.
    #[arg(long)]
    model: Option<String>,

    /// Embedding output dimensionality.
    #[arg(long)]
    dimensions: Option<usize>,

    /// Texts per embedding request.
    #[arg(long)]
    batch_size: Option<usize>,

    /// Maximum results per query.
    #[arg(long)]
    top_k: Option<usize>,

    /// Minimum cosine similarity for a result.
    #[arg(long)]
    min_similarity: Option<f32>,
}

impl Cli {
    fn into_config(self) -> SearchConfig {
        let mut config = SearchConfig::default();
        if let Some(dataset) = self.dataset {
            config.dataset_path = dataset;
        }
        if let Some(cache) = self.cache {
            config.cache_path = cache;
        }
        if let Some(model) = self.model {
            config.model = model;
        }
        if let Some(dimensions) = self.dimensions {
            config.dimensions = dimensions;
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
        if let Some(top_k) = self.top_k {
            config.top_k = top_k;
        }
        if let Some(min_similarity) = self.min_similarity {
            config.min_similarity = min_similarity;
        }
        config
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the key can come from the environment.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().into_config();

    let provider = GeminiProvider::new()
        .with_model(config.model.clone())
        .with_dimension(config.dimensions);
    if !provider.is_available() {
        anyhow::bail!("GEMINI_API_KEY is not set");
    }

    let mut engine = SearchEngine::new(config, provider)
        .await
        .context("failed to initialize search engine")?;

    let report = engine
        .reconcile()
        .await
        .context("failed to reconcile embedding cache")?;
    if report.missing == 0 {
        println!("All {} products already have embeddings.", report.total);
    } else {
        println!(
            "Embedded {} missing products in {} batches.",
            report.missing, report.batches
        );
    }

    print!("Enter your search query: ");
    std::io::stdout().flush()?;
    let mut query = String::new();
    std::io::stdin().read_line(&mut query)?;
    let query = query.trim();
    if query.is_empty() {
        println!("Empty query, nothing to search.");
        return Ok(());
    }

    let matches = engine.search(query).await.context("search failed")?;
    if matches.is_empty() {
        println!("No products matched the query.");
        return Ok(());
    }

    for m in &matches {
        println!("Product ID: {}", m.product.asin);
        println!("Similarity Score: {:.4}", m.score);
        println!("Product Name: {}", m.product.title);
        println!("Product Price: {}", m.product.price);
        println!("Category: {}", m.product.category_name);
        println!("Product URL: {}", m.product.product_url);
        println!("Image URL: {}", m.product.img_url);
        println!("{}", "-".repeat(50));
    }

    Ok(())
}
