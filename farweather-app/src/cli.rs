use std::sync::Arc;

use anyhow::{Result, bail};
use chrono::Local;
use clap::{Parser, Subcommand};

use farweather_core::{
    Config, LocationStore, OpenMeteoClient, StaticHost, WeatherApp, WeatherQueries,
};

use crate::{shell, view};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "farweather", version, about = "Weather mini-app in the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the interactive app (the default when no command is given).
    Run,

    /// Store the directory-service API key used for profile-location lookups.
    Configure,

    /// One-shot forecast for a place name, no interaction.
    Show {
        /// Place name, e.g. "Paris".
        query: String,

        /// Print the full hourly/daily view instead of a one-line summary.
        #[arg(long)]
        full: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command.unwrap_or(Command::Run) {
            Command::Run => run_interactive().await,
            Command::Configure => configure(),
            Command::Show { query, full } => show(&query, full).await,
        }
    }
}

/// Viewer identity as provided by the embedding host. Outside the host the
/// environment stands in: FARWEATHER_FID and FARWEATHER_USERNAME.
fn host_from_env() -> StaticHost {
    let fid = std::env::var("FARWEATHER_FID")
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok());
    let username = std::env::var("FARWEATHER_USERNAME")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    match (fid, username) {
        (Some(fid), Some(username)) => {
            tracing::debug!(fid, "using viewer identity from environment");
            StaticHost::signed_in(fid, username)
        }
        _ => StaticHost::signed_out(),
    }
}

async fn run_interactive() -> Result<()> {
    let config = Config::load()?;
    let store = LocationStore::open()?;
    let app = WeatherApp::new(&config, store, Arc::new(host_from_env()))?;
    shell::Shell::new(app).run().await
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("Directory service API key:")
        .without_confirmation()
        .prompt()?;
    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        bail!("No API key entered; nothing saved.");
    }

    config.set_directory_api_key(api_key);
    config.save()?;
    println!(
        "Directory API key saved to {}",
        Config::config_file_path()?.display()
    );
    Ok(())
}

async fn show(query: &str, full: bool) -> Result<()> {
    let config = Config::load()?;
    let client = OpenMeteoClient::new(&config)?;

    let results = client.search_locations(query).await?;
    let Some(location) = results.into_iter().next() else {
        bail!("No places found for '{query}'");
    };

    let queries = WeatherQueries::new(client);
    let data = queries.weather(location.latitude, location.longitude).await?;

    if full {
        println!("{}", view::render_weather(&location, &data, Local::now().naive_local()));
    } else {
        println!("{}: {}", location.display_label(), view::render_summary(&data));
    }
    Ok(())
}
