//! Framesight CLI: visual feature analysis for motion-graphics frames.
//!
//! Usage:
//!   framesight analyze <IMAGE>...   Analyze one or more images
//!   framesight init                 Write the default configuration
//!   framesight config               Show the effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "framesight",
    about = "Visual feature analysis and editing recommendations for frames",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to $FRAMESIGHT_CONFIG or the standard location)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze image files and print features and recommendations
    Analyze {
        /// Images to analyze (PNG, JPEG, ...)
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// Directory to write per-image JSON results and a cache snapshot
        #[arg(short, long)]
        export: Option<PathBuf>,

        /// Print full results as JSON instead of a summary
        #[arg(long)]
        json: bool,

        /// Composition grid size (overrides config)
        #[arg(long)]
        grid_size: Option<usize>,

        /// Color sampling stride (overrides config)
        #[arg(long)]
        stride: Option<usize>,

        /// Bypass the result cache
        #[arg(long)]
        no_cache: bool,

        /// Attach the offline feature summary as insight text
        #[arg(long)]
        offline_insight: bool,

        /// Hide summary recommendations below this priority
        #[arg(long, value_enum, default_value_t = commands::analyze::PriorityArg::Low)]
        min_priority: commands::analyze::PriorityArg,
    },

    /// Write the default configuration file
    Init {
        /// Output path (defaults to the standard config location)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = commands::load_config(cli.config.as_deref())?;

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    framesight_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Analyze {
            images,
            export,
            json,
            grid_size,
            stride,
            no_cache,
            offline_insight,
            min_priority,
        } => {
            commands::analyze::run(
                config,
                commands::analyze::AnalyzeArgs {
                    images,
                    export,
                    json,
                    grid_size,
                    stride,
                    no_cache,
                    offline_insight,
                    min_priority,
                },
            )
            .await
        }
        Commands::Init { output, force } => commands::init::run(output, force),
        Commands::Config => commands::config::run(&config, cli.config.as_deref()),
    }
}
