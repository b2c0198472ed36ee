mod intro;
mod place;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::intro::IntroCommands;
use crate::place::PlaceCommands;

#[derive(Debug, Parser)]
#[command(name = "tripboard-cli")]
#[command(about = "Tripboard tourism data command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Normalize and inspect content-type-specific intro records
    Intro {
        #[command(subcommand)]
        command: IntroCommands,
    },
    /// Fetch place details from the tourism API
    Place {
        #[command(subcommand)]
        command: PlaceCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = tripboard_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    // stdout carries command output; keep diagnostics on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Intro { command }) => match command {
            IntroCommands::Normalize {
                content_type_id,
                file,
            } => intro::run_intro_normalize(&content_type_id, file.as_deref())?,
            IntroCommands::Fields => intro::run_intro_fields(),
        },
        Some(Commands::Place { command }) => match command {
            PlaceCommands::Detail {
                content_id,
                content_type_id,
                json,
            } => place::run_place_detail(&config, &content_id, &content_type_id, json).await?,
        },
        None => println!("tripboard-cli: run with --help to list commands"),
    }

    Ok(())
}
