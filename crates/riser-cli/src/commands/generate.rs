use anyhow::{Context, Result};
use riser_algo::{generate, GeneratorConfig};
use riser_core::Building;
use std::path::Path;
use tracing::info;

pub fn handle(floors: u32, apartments: u32, seed: u64, out: &Path) -> Result<()> {
    let config = GeneratorConfig::new(floors, apartments).with_seed(seed);
    let input = generate(&config);

    // Round-trip through validation before writing
    let building = Building::from_input(input.clone()).context("validating generated building")?;
    input
        .to_path(out)
        .with_context(|| format!("writing building to {}", out.display()))?;

    info!(
        "Generated {} floors x {} apartments (seed {})",
        floors, apartments, seed
    );
    println!(
        "Wrote {} apartments and {} outlets to {}",
        building.occupied_apartments().count(),
        building.num_outlets(),
        out.display()
    );
    Ok(())
}
