mod filter;
mod io;
mod sample;
mod series;
mod stats;

use clap::{Parser, Subcommand};
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "ffp",
    version,
    about = "Farthest Feasible Point filter: drops samples that stay within a band of the trend"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Filter series, writing the kept samples
    Filter(filter::Opts),
    /// Report how many samples each series keeps
    Stats(stats::Opts),
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    debug!("Verbose level: {}", cli.verbose);

    match cli.command {
        Command::Filter(opts) => filter::filter(&opts).await,
        Command::Stats(opts) => stats::stats(&opts).await,
    }
}
