//! Route recommendation REST server.
//!
//! Loads the saved snapshot from `data.index_dir` when there is one; otherwise
//! starts empty (or ingests `data.raw_dir` with `--ingest`) and waits for
//! `POST /api/admin/ingest-data`.

use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use routedb_api::{start_server, AppState};
use routedb_cli::{data_dirs, init_tracing, load_config};
use routedb_core::config::DEFAULT_BIND;
use routedb_core::error::Error;
use routedb_service::{ingest, persist, restore, ModelSlot};

#[derive(Parser)]
#[command(name = "routedb-server")]
#[command(about = "Route recommendation REST API server")]
#[command(version)]
struct Args {
    /// Server bind address (default: server.bind)
    #[arg(long)]
    bind: Option<SocketAddr>,

    #[arg(long, default_value = ".", env = "ROUTEDB_CONFIG_DIR")]
    config_dir: PathBuf,

    #[arg(long)]
    raw_dir: Option<PathBuf>,

    #[arg(long)]
    index_dir: Option<PathBuf>,

    /// Build the index from raw data at startup when no snapshot exists
    #[arg(long)]
    ingest: bool,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);
    let config = load_config(&args.config_dir)?;
    let (raw_dir, index_dir) = data_dirs(&config, args.raw_dir, args.index_dir);
    let vectorizer = config.vectorizer()?;
    let bind = match args.bind {
        Some(addr) => addr,
        None => config
            .get::<String>("server.bind")
            .unwrap_or_else(|_| DEFAULT_BIND.to_string())
            .parse()
            .context("parsing server.bind")?,
    };

    let slot = ModelSlot::new();
    let snapshot_dir = index_dir.clone();
    match tokio::task::spawn_blocking(move || restore(&snapshot_dir)).await? {
        Ok(catalog) => {
            println!("📦 Loaded index {} ({} routes)", catalog.model_id(), catalog.routes().len());
            slot.install(catalog).await;
        }
        Err(e) if matches!(e.downcast_ref::<Error>(), Some(Error::UnknownModel(_))) => {
            if args.ingest {
                let (raw, dir) = (raw_dir.clone(), index_dir.clone());
                let catalog = tokio::task::spawn_blocking(move || -> anyhow::Result<_> {
                    let catalog = ingest(&raw, vectorizer)?;
                    persist(&catalog, &dir)?;
                    Ok(catalog)
                })
                .await??;
                println!("🧮 Built index {} ({} routes)", catalog.model_id(), catalog.routes().len());
                slot.install(catalog).await;
            } else {
                println!("⚠️  No index in {}; POST /api/admin/ingest-data to build one", index_dir.display());
            }
        }
        Err(e) => return Err(e),
    }

    let state = AppState::new(slot, raw_dir, Some(index_dir), vectorizer);
    println!("🚀 Serving on http://{bind}/api");
    start_server(bind, state, &config.cors_origins()).await
}
