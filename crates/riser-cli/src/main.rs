use clap::Parser;
use riser_cli::{Cli, Commands};
use tracing::error;
use tracing_subscriber::FmtSubscriber;

mod commands;

use commands::solve::SolveArgs;

fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Solve {
            input,
            out,
            time_limit,
            gap,
            threads,
            accept_time_limited,
            format,
        } => commands::solve::handle(SolveArgs {
            input,
            out: out.as_deref(),
            time_limit: *time_limit,
            gap: *gap,
            threads,
            accept_time_limited: *accept_time_limited,
            format: *format,
        }),
        Commands::Validate { input } => commands::validate::handle(input),
        Commands::Partition {
            floors,
            trunk_floor,
        } => commands::partition::handle(*floors, *trunk_floor),
        Commands::Generate {
            floors,
            apartments,
            seed,
            out,
        } => commands::generate::handle(*floors, *apartments, *seed, out),
    }
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so JSON on stdout stays clean
    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    if let Err(e) = run(&cli) {
        error!("{:?}", e);
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
