use clap::{Parser, Subcommand};

mod commands;

use commands::{GenerateArgs, ReportArgs};

#[derive(Parser)]
#[command(name = "retail-synth")]
#[command(about = "Synthetic retail transaction dataset generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate customers, products, and sales CSV files
    Generate(GenerateArgs),
    /// Generate a dataset in memory and print summary statistics
    Report(ReportArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Generate(args) => commands::run_generate(args),
        Commands::Report(args) => commands::run_report(args),
    }
}
