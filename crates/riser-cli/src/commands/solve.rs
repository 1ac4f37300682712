//! `riser solve`: design a building and report the result.

use anyhow::{Context, Result};
use riser_algo::{
    build_report, design_network, BuildingReport, Design, DesignOptions, SolverConfig,
};
use riser_core::Building;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tabwriter::TabWriter;
use tracing::info;

use crate::commands::util::resolve_threads;
use riser_cli::OutputFormat;

/// Everything written by `--out` and `--format json`.
#[derive(Debug, Serialize)]
struct SolveOutput<'a> {
    design: &'a Design,
    report: &'a BuildingReport,
}

pub struct SolveArgs<'a> {
    pub input: &'a Path,
    pub out: Option<&'a Path>,
    pub time_limit: f64,
    pub gap: f64,
    pub threads: &'a str,
    pub accept_time_limited: bool,
    pub format: OutputFormat,
}

pub fn handle(args: SolveArgs<'_>) -> Result<()> {
    let building = Building::from_path(args.input)
        .with_context(|| format!("loading building from {}", args.input.display()))?;

    let solver = SolverConfig::default()
        .with_time_limit(args.time_limit)
        .with_gap(args.gap)
        .with_threads(Some(resolve_threads(args.threads)));
    let mut options = DesignOptions::default().with_solver(solver);
    if args.accept_time_limited {
        options = options.accept_time_limited();
    }

    let design = design_network(&building, &options).context("designing riser network")?;
    let report = build_report(&building, &design);
    info!("{}", design.headline());

    let output = SolveOutput {
        design: &design,
        report: &report,
    };
    if let Some(path) = args.out {
        let file = File::create(path)
            .with_context(|| format!("creating output file {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &output).context("serializing design")?;
        writer.flush().context("writing design")?;
        info!("Design written to {}", path.display());
    }

    match args.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(io::stdout(), &output).context("serializing design")?;
            println!();
        }
        OutputFormat::Table => print_tables(&design, &report)?,
    }
    Ok(())
}

fn fmt_level(level: Option<f64>) -> String {
    level.map_or_else(|| "-".to_string(), |l| format!("{l:.2}"))
}

fn print_tables(design: &Design, report: &BuildingReport) -> Result<()> {
    let s = &design.summary;
    println!("Riser design ({})", s.status);
    println!(
        "  Trunk        : {} on floor {} ({:.1} dB)",
        design.trunk.model, design.trunk.floor, design.trunk.insertion_loss_db
    );
    println!("  Outlets      : {} ({} in band)", s.outlets, s.compliant_outlets);
    println!(
        "  Levels       : min {} / mean {} / max {} dBµV",
        fmt_level(s.min_level_dbuv),
        fmt_level(s.mean_level_dbuv),
        fmt_level(s.max_level_dbuv)
    );
    println!("  Deviation    : {:.2} dB", s.total_deviation_db);
    println!("  Balance error: {:.2e} dB", s.max_balance_error_db);
    println!("  Solve time   : {:.2} s", s.solve_seconds);
    println!();

    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "FLOOR\tBLOCK\tTAP\tOUTLETS\tMIN\tMEAN\tMAX")?;
    for floor in &report.floors {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            floor.floor,
            floor.block,
            floor.tap_model,
            floor.outlets,
            fmt_level(floor.min_level_dbuv),
            fmt_level(floor.mean_level_dbuv),
            fmt_level(floor.max_level_dbuv)
        )?;
    }
    writer.flush()?;
    println!();

    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "OUTLET\tSPLITTER\tLEVEL\tDEVIATION\t470 MHz\t698 MHz\tIN BAND")?;
    for (outlet, freq) in design.outlets.iter().zip(&report.frequencies) {
        writeln!(
            writer,
            "{}\t{}\t{:.2}\t{:+.2}\t{:.2}\t{:.2}\t{}",
            outlet.label,
            outlet.splitter_model.as_deref().unwrap_or("-"),
            outlet.level_dbuv,
            outlet.deviation_db,
            freq.level_470mhz_dbuv,
            freq.level_698mhz_dbuv,
            if outlet.compliant { "yes" } else { "NO" }
        )?;
    }
    writer.flush()?;
    println!();

    let inventory = &report.inventory;
    println!("Inventory");
    println!("  Cable     : {:.1} m", inventory.cable_m);
    println!("  Connectors: {}", inventory.connectors);
    println!("  Outlets   : {}", inventory.outlets);
    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "  MODEL\tUNITS")?;
    for (model, units) in &inventory.equipment {
        writeln!(writer, "  {model}\t{units}")?;
    }
    writer.flush()?;
    Ok(())
}
