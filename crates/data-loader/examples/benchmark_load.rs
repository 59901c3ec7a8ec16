use data_loader::Artifacts;
use std::path::Path;
use std::time::Instant;

fn main() {
    let models_dir = Path::new("models");

    println!("Loading recommendation artifacts...\n");

    let start = Instant::now();
    let artifacts = Artifacts::load_from_dir(models_dir)
        .expect("Failed to load artifacts");
    let elapsed = start.elapsed();

    let (titles, rows, metadata) = artifacts.counts();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Titles: {}", titles);
    println!("Feature rows: {} x {}", rows, artifacts.features.dimension());
    println!("Metadata rows: {}", metadata);
}
