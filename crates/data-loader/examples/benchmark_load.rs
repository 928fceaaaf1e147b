use anyhow::Context;
use data_loader::Catalog;
use std::path::Path;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    let data_dir = Path::new("data/ml-100k");

    println!("Building catalog from {}...\n", data_dir.display());

    let start = Instant::now();
    let (catalog, report) = Catalog::load_from_dir(data_dir).context("Failed to load dataset")?;
    let elapsed = start.elapsed();

    println!("=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Movies: {}", catalog.len());
    println!("Ratings: {}", catalog.total_ratings());
    println!("Skipped rows: {}", report.skipped());
    println!(
        "\nPerformance: {:.0} ratings/second",
        catalog.total_ratings() as f64 / elapsed.as_secs_f64()
    );
    Ok(())
}
