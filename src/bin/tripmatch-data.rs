//! Offline data tooling: seeds the catalog files the API serves from.
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tripmatch_api::{
    init_tracing,
    services::{
        destinations::{fetch_destinations, DEFAULT_PLACE_LIMIT},
        images::{collect_category_images, CATEGORY_TAXONOMY},
        recommendations::{recommend, DEFAULT_TOP_N},
        store, PexelsClient, SkyscannerClient,
    },
    Config,
};

#[derive(Parser)]
#[command(name = "tripmatch-data", about = "Fetch and derive tripmatch catalog files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch one Pexels image per taxonomy query term
    CategoryImages {
        #[arg(short, long, default_value = "category_images.json")]
        output: PathBuf,
    },
    /// Fetch places from the Skyscanner geo hierarchy
    Destinations {
        #[arg(short, long, default_value = "destinations.json")]
        output: PathBuf,
        /// Number of places to keep
        #[arg(short, long, default_value_t = DEFAULT_PLACE_LIMIT)]
        limit: usize,
    },
    /// Rank the catalog against a saved preference list
    Recommend {
        #[arg(short, long, default_value = "user_preferences.json")]
        preferences: PathBuf,
        #[arg(short, long, env = "DESTINATIONS_PATH", default_value = "destinations.json")]
        destinations: PathBuf,
        #[arg(short, long, default_value = "recommended_destinations.json")]
        output: PathBuf,
        #[arg(short = 'n', long, default_value_t = DEFAULT_TOP_N)]
        top_n: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::CategoryImages { output } => {
            let config = Config::from_env()?;
            let client = PexelsClient::new(config.pexels_api_key, config.pexels_api_url);

            let catalog = collect_category_images(&client, &CATEGORY_TAXONOMY).await;
            store::save_json(&output, &catalog)?;

            tracing::info!(
                path = %output.display(),
                images = catalog.image_count(),
                "Category images saved"
            );
        }
        Command::Destinations { output, limit } => {
            let config = Config::from_env()?;
            let client = SkyscannerClient::new(config.skyscanner_api_key, config.skyscanner_api_url);

            let places = fetch_destinations(&client, limit)
                .await
                .context("Failed to fetch destinations")?;
            store::save_json(&output, &places)?;

            tracing::info!(path = %output.display(), count = places.len(), "Destinations saved");
        }
        Command::Recommend {
            preferences,
            destinations,
            output,
            top_n,
        } => {
            let preferences = store::load_preferences(&preferences)?;
            let destinations = store::load_destinations(&destinations)?;

            let recommendations = recommend(&preferences, &destinations, top_n);
            store::save_json(&output, &recommendations)?;

            tracing::info!(
                path = %output.display(),
                count = recommendations.len(),
                "Recommendations saved"
            );
        }
    }

    Ok(())
}
