use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use jobscout_api::{AppState, RestApi};
use jobscout_engine::{Embedder, Retriever};
use jobscout_store::{HashEmbedder, HttpEmbedder, PostingStore, StoreConfig, StoreSnapshot};

/// Hybrid job-posting retrieval engine
#[derive(Parser, Debug)]
#[command(name = "jobscout")]
#[command(about = "Hybrid job-posting retrieval engine", long_about = None)]
struct Args {
    /// Path to the data directory
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// HTTP API port
    #[arg(long, default_value_t = 8080)]
    http_port: u16,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// OpenAI-compatible embeddings endpoint; omit to use the built-in
    /// hashing embedder
    #[arg(long)]
    embed_url: Option<String>,

    /// Model name sent to the embeddings endpoint
    #[arg(long, default_value = "text-embedding-3-small")]
    embed_model: String,

    /// Embedding dimension
    #[arg(long, default_value_t = 256)]
    embed_dim: usize,

    /// Disable the trigram lexical signal (distance-only scoring)
    #[arg(long)]
    disable_trigram: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
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
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting jobscout v{}", env!("CARGO_PKG_VERSION"));
    info!("Data directory: {:?}", args.data_dir);

    std::fs::create_dir_all(&args.data_dir)?;
    let snapshot_path = args.data_dir.join("store.json");

    let store = if snapshot_path.exists() {
        match StoreSnapshot::load(&snapshot_path) {
            Ok(snapshot) => {
                let store = PostingStore::from_snapshot(snapshot);
                let counts = store.counts();
                info!(
                    postings = counts.postings,
                    fragments = counts.fragments,
                    "store restored from snapshot"
                );
                store
            }
            Err(e) => {
                warn!("snapshot load failed, starting empty: {}", e);
                let mut config = StoreConfig::new(args.embed_dim);
                if args.disable_trigram {
                    config = config.without_trigram();
                }
                PostingStore::new(config)
            }
        }
    } else {
        let mut config = StoreConfig::new(args.embed_dim);
        if args.disable_trigram {
            config = config.without_trigram();
        }
        PostingStore::new(config)
    };
    let store = Arc::new(store);

    let embedder: Arc<dyn Embedder> = match &args.embed_url {
        Some(url) => {
            info!(url = url.as_str(), model = args.embed_model.as_str(), "using HTTP embedder");
            Arc::new(HttpEmbedder::new(
                url.clone(),
                args.embed_model.clone(),
                store.config().vector_dim,
            ))
        }
        None => {
            info!(dim = store.config().vector_dim, "using hashing embedder");
            Arc::new(HashEmbedder::new(store.config().vector_dim))
        }
    };
    anyhow::ensure!(
        embedder.dim() == store.config().vector_dim,
        "embedder dimension {} does not match store dimension {}",
        embedder.dim(),
        store.config().vector_dim
    );

    let state = AppState {
        retriever: Retriever::new(embedder, store.clone()),
        store: store.clone(),
    };

    let http_port = args.http_port;
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(state, http_port).await {
                eprintln!("HTTP server error: {}", e);
            }
        })
    });

    info!("jobscout started successfully");
    info!("HTTP API: http://localhost:{}/", args.http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Saving snapshot before shutdown...");
    if let Err(e) = store.snapshot().save(&snapshot_path) {
        warn!("snapshot save failed: {}", e);
    }
    info!("Shutting down...");
    Ok(())
}
