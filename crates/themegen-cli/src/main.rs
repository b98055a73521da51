mod commands;
mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "themegen",
    version,
    about = "Batch LLM theme enrichment: paginate a table, enrich every row, commit the successes"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an enrichment pipeline
    Run {
        /// Path to pipeline YAML file
        pipeline: PathBuf,
        /// Also print the summary as one JSON line
        #[arg(long)]
        json: bool,
    },
    /// Validate pipeline configuration and collaborator connectivity
    Check {
        /// Path to pipeline YAML file
        pipeline: PathBuf,
    },
    /// Print the window plan for the current source row count
    Plan {
        /// Path to pipeline YAML file
        pipeline: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log_level);

    match cli.command {
        Commands::Run { pipeline, json } => commands::run::execute(&pipeline, json).await,
        Commands::Check { pipeline } => commands::check::execute(&pipeline).await,
        Commands::Plan { pipeline } => commands::plan::execute(&pipeline).await,
    }
}
