use anyhow::{Context, Result};
use riser_algo::plan_risers;
use riser_core::Building;
use std::path::Path;
use tracing::info;

pub fn handle(input: &Path) -> Result<()> {
    info!("Validating building description {}", input.display());
    let building = Building::from_path(input)
        .with_context(|| format!("loading building from {}", input.display()))?;
    let params = &building.params;
    let blocks = plan_risers(params.floors, params.trunk_floor())
        .context("planning riser blocks")?;

    println!("Building description is valid");
    println!("  Floors              : {}", params.floors);
    println!("  Apartments per floor: {}", params.apartments_per_floor);
    println!(
        "  Occupied apartments : {}",
        building.occupied_apartments().count()
    );
    println!("  Outlets             : {}", building.num_outlets());
    println!("  Trunk floor         : {}", params.trunk_floor());
    println!("  Riser blocks        : {}", blocks.len());
    println!(
        "  Catalog             : {} taps, {} splitters",
        building.catalog.taps.len(),
        building.catalog.splitters.len()
    );
    Ok(())
}
