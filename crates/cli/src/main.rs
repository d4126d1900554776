mod commands;
mod config;
mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use commands::page::{PageName, SatisfactionArgs};
use commands::FilterArgs;

#[derive(Parser)]
#[command(name = "dashboard")]
#[command(about = "Delivery-order analytics from the dashboard API or local CSV files", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a local CSV of orders
    Import {
        /// Path to the CSV file (";" or "," separated)
        csv: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Normalize and filter a CSV of orders into the export layout
    Export {
        /// Source CSV file
        input: PathBuf,

        /// Destination CSV file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Load a dashboard page from the API
    Page {
        #[arg(value_enum)]
        name: PageName,

        /// API address, overriding config.toml and DASHBOARD_API_URL
        #[arg(long)]
        api_url: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,

        #[command(flatten)]
        satisfaction: SatisfactionArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.verbose)?;

    match cli.command {
        Commands::Import { csv, filters } => commands::import::execute(&csv, &filters),
        Commands::Export {
            input,
            output,
            filters,
        } => commands::export::execute(&input, &output, &filters),
        Commands::Page {
            name,
            api_url,
            filters,
            satisfaction,
        } => {
            let mut config = config::load_config()?;
            if let Some(url) = api_url {
                config.api.base_url = url;
            }
            commands::page::execute(&config, name, &filters, &satisfaction).await
        }
    }
}
