//! `ragcache` command-line entrypoint.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use ragcache::cache::CacheTier;
use ragcache::config::Config;
use ragcache::embedding::{CrossEncoder, CrossEncoderConfig, EmbedderConfig, SentenceEmbedder};
use ragcache::ingest::{IngestConfig, ingest, load_pages};
use ragcache::retrieval::RetrievalTier;
use ragcache::scoring::Reranker;
use ragcache::search::SearchPipeline;
use ragcache::vectordb::{QdrantClient, QdrantIndex};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Cache-augmented policy search with reranking and citations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load document pages into the main collection
    Ingest {
        /// JSON file of `[{"page_label": ..., "text": ...}]`
        #[arg(long)]
        pages: PathBuf,

        /// Policy name recorded on every page (defaults to RAGCACHE_DEFAULT_POLICY_NAME)
        #[arg(long)]
        policy_name: Option<String>,

        /// Drop pages with fewer words than this
        #[arg(long, default_value_t = ragcache::ingest::DEFAULT_MIN_WORDS)]
        min_words: usize,
    },

    /// Answer a query (cache first) and print reranked results with citations
    Search {
        query: String,

        /// Neighbours fetched from the main collection on a cache miss
        #[arg(short = 'n', long)]
        n_results: Option<usize>,
    },

    /// Show document counts of both collections
    Stats,

    /// Exit 0 when the main collection is reachable and populated
    Health,
}

type CliPipeline = SearchPipeline<QdrantIndex, QdrantIndex, CrossEncoder>;

struct Indices {
    main: QdrantIndex,
    cache: QdrantIndex,
}

fn build_embedder(config: &Config) -> anyhow::Result<Arc<SentenceEmbedder>> {
    let embedder_config = match &config.embedder_path {
        Some(path) => EmbedderConfig::new(path.clone()),
        None => {
            tracing::warn!("No RAGCACHE_EMBEDDER_PATH configured, running embedder in stub mode");
            EmbedderConfig::stub()
        }
    }
    .with_embedding_dim(config.embedding_dim);

    Ok(Arc::new(SentenceEmbedder::load(embedder_config)?))
}

async fn build_indices(config: &Config) -> anyhow::Result<Indices> {
    let client = QdrantClient::new(&config.qdrant_url)?;
    let embedder = build_embedder(config)?;

    let main = QdrantIndex::new(client.clone(), &config.main_collection, embedder.clone());
    let cache = QdrantIndex::new(client, &config.cache_collection, embedder);

    main.ensure_collection()
        .await
        .with_context(|| format!("preparing collection '{}'", config.main_collection))?;
    cache
        .ensure_collection()
        .await
        .with_context(|| format!("preparing collection '{}'", config.cache_collection))?;

    Ok(Indices { main, cache })
}

fn build_pipeline(config: &Config, indices: Indices) -> anyhow::Result<CliPipeline> {
    let reranker_config = match &config.reranker_path {
        Some(path) => CrossEncoderConfig::new(path.clone()),
        None => CrossEncoderConfig::stub(),
    };
    let cross_encoder = CrossEncoder::load(reranker_config)?;

    let cache = CacheTier::new(indices.cache, config.cache_threshold)
        .with_default_policy_name(config.default_policy_name.clone());

    Ok(SearchPipeline::new(
        RetrievalTier::new(indices.main),
        cache,
        Reranker::new(cross_encoder),
        config.search_config(),
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    config.validate()?;

    tracing::debug!(
        qdrant_url = %config.qdrant_url,
        main_collection = %config.main_collection,
        cache_collection = %config.cache_collection,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Ingest {
            pages,
            policy_name,
            min_words,
        } => {
            let pages = load_pages(&pages)?;
            let indices = build_indices(&config).await?;
            let policy_name = policy_name.unwrap_or_else(|| config.default_policy_name.clone());

            let report = ingest(
                &indices.main,
                pages,
                &policy_name,
                IngestConfig::default().min_words(min_words),
            )
            .await?;

            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Search { query, n_results } => {
            let pipeline = build_pipeline(&config, build_indices(&config).await?)?;
            let outcome = pipeline.search(&query, n_results).await?;

            let output = serde_json::json!({
                "query": query,
                "status": outcome.status.as_str(),
                "from_cache": outcome.from_cache(),
                "results": outcome.results,
                "citations": outcome.citations(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Stats => {
            let pipeline = build_pipeline(&config, build_indices(&config).await?)?;
            let stats = pipeline.stats().await?;

            let output = serde_json::json!({
                "main_collection": config.main_collection,
                "main_documents": stats.main_documents,
                "cache_collection": config.cache_collection,
                "cache_entries": stats.cache_entries,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Health => {
            let client = QdrantClient::new(&config.qdrant_url)?;
            if let Err(e) = client.health_check().await {
                println!("unavailable: {e}");
                return Ok(ExitCode::FAILURE);
            }

            let embedder = build_embedder(&config)?;
            let indices = Indices {
                main: QdrantIndex::new(client.clone(), &config.main_collection, embedder.clone()),
                cache: QdrantIndex::new(client, &config.cache_collection, embedder),
            };
            let status = build_pipeline(&config, indices)?.health().await;
            println!("{status}");

            if !status.is_ready() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
