use clap::Parser;
use std::path::PathBuf;

use routedb_cli::{data_dirs, init_tracing, load_config};
use routedb_service::{ingest, persist};

#[derive(Parser)]
#[command(name = "routedb-indexer")]
#[command(about = "Build the route similarity index from OpenFlights data and save it")]
#[command(version)]
struct Args {
    /// Directory containing airports.dat, airlines.dat and routes.dat (default: data.raw_dir)
    raw_dir: Option<PathBuf>,

    /// Where to write the snapshot (default: data.index_dir)
    #[arg(long)]
    index_dir: Option<PathBuf>,

    /// Directory holding config.toml
    #[arg(long, default_value = ".", env = "ROUTEDB_CONFIG_DIR")]
    config_dir: PathBuf,

    /// Keep only the N most frequent n-grams
    #[arg(long)]
    max_features: Option<usize>,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);
    let config = load_config(&args.config_dir)?;
    let (raw_dir, index_dir) = data_dirs(&config, args.raw_dir, args.index_dir);
    let mut vectorizer = config.vectorizer()?;
    if args.max_features.is_some() { vectorizer.max_features = args.max_features; }
    vectorizer.validate()?;

    println!("Route Indexer\n=============");
    println!("Data directory: {}", raw_dir.display());
    println!("Index directory: {}", index_dir.display());

    let catalog = ingest(&raw_dir, vectorizer)?;
    let manifest = persist(&catalog, &index_dir)?;

    println!("\n✅ Indexing completed successfully!");
    println!("📊 {} airports, {} airlines, {} routes", catalog.airports.len(), catalog.airlines.len(), manifest.records);
    println!("🧮 Model {} ({} n-grams)", manifest.model_id, manifest.vocabulary);
    println!("\n💡 To query, use: cargo run --bin routedb-recommend -- JFK LAX");
    println!("💡 To serve, use: cargo run --bin routedb-server");
    Ok(())
}
