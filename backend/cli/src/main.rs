mod config_cmd;
mod normalize_cmd;
mod print_cmd;
mod serve_cmd;
mod terminal_output;
mod wiring;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "telefax")]
#[command(about = "Telefax: print images sent over Telegram on a label printer")]
#[command(version)]
struct Cli {
    /// YAML config file (defaults to $TELEFAX_CONFIG; environment variables override it)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Telegram bot
    Serve,
    /// Print one image through the pipeline as the local operator
    Print {
        /// Image file to print
        image: PathBuf,
        /// Caption, e.g. "3 copies"
        #[arg(long)]
        caption: Option<String>,
    },
    /// Write the normalized label to a file without printing
    Normalize {
        input: PathBuf,
        /// Output file; the extension (.png/.jpg) picks the encoding
        output: PathBuf,
    },
    /// Show the effective configuration with secrets masked
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Serve => serve_cmd::run(config_path).await,
        Commands::Print { image, caption } => print_cmd::run(config_path, &image, caption).await,
        Commands::Normalize { input, output } => {
            normalize_cmd::run(config_path, &input, &output).await
        }
        Commands::Config => config_cmd::run(config_path).await,
    }
}
