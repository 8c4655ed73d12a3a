//! Loads the vector dump, builds the index and prints the nearest neighbour of one point.
//!
//! Usage: `cargo run --release --example search -- [config.toml] [id]`

use kdsearch::{load_points, Catalog, Config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let query_id: usize = args.next().map(|s| s.parse()).transpose()?.unwrap_or(0);

    let points = load_points(&config.ingest.path, config.index.dimension, config.ingest.limit)?;
    let catalog = Catalog::new(points, config.index.clone())?;

    let response = catalog.search(query_id)?;
    println!("{}", response.to_json()?);

    if let Some(preview) = catalog.tree_preview(3) {
        println!("{}", serde_json::to_string_pretty(&preview)?);
    }
    Ok(())
}
