use clap::Parser;
use std::path::PathBuf;

use routedb_cli::{data_dirs, init_tracing, load_config};
use routedb_service::{ingest, restore};

#[derive(Parser)]
#[command(name = "routedb-recommend")]
#[command(about = "Print routes similar to SOURCE-DESTINATION")]
#[command(version)]
struct Args {
    /// Origin IATA code, e.g. JFK
    source: String,

    /// Destination IATA code, e.g. LAX
    destination: String,

    #[arg(short = 'k', long, default_value_t = 10)]
    top_k: usize,

    /// Also list the exact routes flown between the two airports
    #[arg(long)]
    direct: bool,

    /// Fit a fresh index from this OpenFlights directory instead of loading the snapshot
    #[arg(long)]
    raw_dir: Option<PathBuf>,

    #[arg(long)]
    index_dir: Option<PathBuf>,

    #[arg(long, default_value = ".", env = "ROUTEDB_CONFIG_DIR")]
    config_dir: PathBuf,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);
    let config = load_config(&args.config_dir)?;
    let fresh = args.raw_dir.is_some();
    let (raw_dir, index_dir) = data_dirs(&config, args.raw_dir, args.index_dir);
    let catalog = if fresh { ingest(&raw_dir, config.vectorizer()?)? } else { restore(&index_dir)? };

    println!("🔍 routedb-recommend\n==================");
    println!("Route: {}-{}", args.source, args.destination);
    println!("Model: {}", catalog.model_id());

    if args.direct {
        let direct = catalog.service.direct_routes(&args.source, &args.destination)?;
        println!("\n✈️  {} direct routes", direct.len());
        for r in &direct {
            println!("  {}  {}-{}  stops={}  equipment={}", r.carrier_code, r.source_code, r.dest_code, r.stops, r.equipment.as_deref().unwrap_or("-"));
        }
    }

    let hits = catalog.service.recommend(&args.source, &args.destination, args.top_k)?;
    println!("\n🔍 Found {} similar routes", hits.len());
    for (i, h) in hits.iter().enumerate() {
        println!("  {}. {}-{}  airline={}  similarity={:.4}", i + 1, h.source_code, h.dest_code, h.carrier_code, h.similarity_score);
    }
    Ok(())
}
