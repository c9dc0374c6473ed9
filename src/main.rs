use anyhow::Context;
use asteria::{cluster_embeddings, rank_matches, EngineConfig, Error, FileStore};
use asteria_core::config::{DEFAULT_EMBED_DIM, DEFAULT_K, DEFAULT_MAX_ITERS, DEFAULT_SEED};
use asteria_core::mean_pool;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Embedding clustering and match ranking
#[derive(Parser, Debug)]
#[command(name = "asteria")]
#[command(about = "Cluster user embeddings and rank matches", long_about = None)]
struct Args {
    /// Path to the data directory
    #[arg(short, long, default_value = "./data", global = true)]
    data_dir: PathBuf,

    /// Dimension every embedding is fitted to
    #[arg(long, env = "EMBED_DIM", default_value_t = DEFAULT_EMBED_DIM, global = true)]
    embed_dim: usize,

    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mean-pool a batch of embeddings into a user's stored embedding
    Pool {
        #[arg(long)]
        user: String,
        /// JSON file holding an array of vectors
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value = "youtube")]
        source: String,
    },
    /// Recompute clusters from all stored embeddings
    Cluster {
        /// Nominal cluster count
        #[arg(long, env = "KMEANS_K", default_value_t = DEFAULT_K)]
        k: usize,
        #[arg(long, default_value_t = DEFAULT_MAX_ITERS)]
        max_iters: usize,
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u32,
        /// Report this user's assignment
        #[arg(long)]
        user: Option<String>,
    },
    /// Rank matches for a user
    Matches {
        #[arg(long)]
        user: String,
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Asteria v{}", env!("CARGO_PKG_VERSION"));
    info!("Data directory: {:?}", args.data_dir);

    let store = FileStore::new(&args.data_dir)?;
    let mut config = EngineConfig {
        embed_dim: args.embed_dim,
        ..Default::default()
    };

    let output = match args.command {
        Command::Pool { user, input, source } => {
            let data = std::fs::read(&input).with_context(|| format!("reading {:?}", input))?;
            let vectors: Vec<Vec<f64>> =
                serde_json::from_slice(&data).with_context(|| format!("parsing {:?}", input))?;
            let pooled = mean_pool(&vectors, config.embed_dim)?;
            store.upsert_embedding(&user, &pooled, &source)?;
            info!(user = %user, count = vectors.len(), "stored pooled embedding");
            json!({ "embedded_count": vectors.len() })
        }
        Command::Cluster { k, max_iters, seed, user } => {
            config.k = k;
            config.max_iters = max_iters;
            config.seed = seed;
            let raw = store.load_embeddings()?;
            match cluster_embeddings(&raw, &config) {
                Ok(snapshot) => {
                    store.save_clusters(&snapshot)?;
                    info!(
                        clusters = snapshot.centroids.len(),
                        users = snapshot.assignments.len(),
                        "clusters updated"
                    );
                    match user {
                        Some(user) => match snapshot.assignment_for(&user) {
                            Some(a) => json!({ "cluster_id": a.cluster_id, "similarity": a.similarity }),
                            None => json!({ "error": "user has no valid embedding yet" }),
                        },
                        None => json!({
                            "clusters": snapshot.centroids.len(),
                            "cluster_sizes": snapshot.cluster_sizes(),
                            "iterations": snapshot.iterations,
                        }),
                    }
                }
                Err(Error::EmptyInputSet) => {
                    warn!(rows = raw.len(), "nothing to cluster");
                    json!({ "message": "no valid embeddings yet; run pool first" })
                }
                Err(e) => return Err(e.into()),
            }
        }
        Command::Matches { user, limit } => {
            config.validate()?;
            let (query, candidates) = store.load_match_inputs(&user, config.embed_dim)?;
            let response = rank_matches(&query, candidates, limit, &config);
            serde_json::to_value(&response)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
