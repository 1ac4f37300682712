use anyhow::{Context, Result};
use riser_algo::plan_risers;
use riser_core::DesignParams;
use std::io::{self, Write};
use tabwriter::TabWriter;

pub fn handle(floors: u32, trunk_floor: Option<u32>) -> Result<()> {
    let mut params = DesignParams::new(floors, 1);
    if let Some(floor) = trunk_floor {
        params = params.with_trunk_floor(floor);
    }
    params.validate().context("checking floors and trunk floor")?;

    let trunk_floor = params.trunk_floor();
    let blocks = plan_risers(floors, trunk_floor)
        .with_context(|| format!("partitioning {floors} floors"))?;

    println!(
        "{} floors, trunk on floor {}, {} blocks",
        floors,
        trunk_floor,
        blocks.len()
    );
    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "BLOCK\tFLOORS\tENTRY\tDIRECTION")?;
    for block in &blocks {
        let top = block.floors.iter().max().copied().unwrap_or_default();
        let bottom = block.floors.iter().min().copied().unwrap_or_default();
        writeln!(
            writer,
            "{}\t{}..{}\t{}\t{}",
            block.index, top, bottom, block.entry_floor, block.direction
        )?;
    }
    writer.flush()?;
    Ok(())
}
