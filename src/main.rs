//! Trellis CLI entry point

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "trellis")]
#[command(about = "Discover the components of a container from type metadata", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Populate the configured container and print what was found
    Discover {
        /// Type catalog produced by a metadata extractor (JSON)
        #[arg(short, long)]
        catalog: PathBuf,

        /// Discovery configuration
        #[arg(long, default_value = "trellis.toml")]
        config: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the types of a catalog
    Types {
        #[arg(short, long)]
        catalog: PathBuf,

        /// Only list types under this namespace
        #[arg(short, long)]
        namespace: Option<String>,
    },
    /// Show version
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "trellis={0},trellis_core={0},trellis_discovery={0}",
            log_level
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Discover {
            catalog,
            config,
            format,
            output,
        } => commands::discover(&catalog, &config, format, output.as_deref()),
        Commands::Types { catalog, namespace } => commands::types(&catalog, namespace.as_deref()),
        Commands::Version => {
            println!("Trellis v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
