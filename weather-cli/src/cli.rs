use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use anyhow::{Context, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, Text};
use weatherboard_core::{
    Config, Geocoder, GeoLocation, build_features, provider_from_config, sun_times,
};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherboard", version, about = "Weather dashboard and synthetic weather data")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a synthetic hourly weather series as JSON lines.
    Generate {
        /// Number of days to simulate; defaults to the configured value.
        #[arg(long)]
        days: Option<u32>,

        /// Random seed; defaults to the configured value.
        #[arg(long)]
        seed: Option<u64>,

        /// Write to this file instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Print the model feature table of a synthetic series as JSON.
    Features {
        #[arg(long)]
        days: Option<u32>,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// List the cities used for synthetic generation.
    Cities,

    /// Show current weather, hourly outlook, sun times and air quality for a city.
    Show {
        /// City or place name.
        city: String,
    },

    /// Show the daily forecast for a city.
    Forecast {
        city: String,

        /// Number of days (1-16).
        #[arg(long, default_value_t = 3)]
        days: u32,
    },

    /// Interactively set generator defaults and add cities.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Generate { days, seed, output } => generate(&config, days, seed, output),
            Command::Features { days, seed } => features(&config, days, seed),
            Command::Cities => {
                print!("{}", output::cities(&config.catalog()));
                Ok(())
            }
            Command::Show { city } => show(&config, &city).await,
            Command::Forecast { city, days } => forecast(&config, &city, days).await,
            Command::Configure => configure(config),
        }
    }
}

fn generate(
    config: &Config,
    days: Option<u32>,
    seed: Option<u64>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let days = days.unwrap_or(config.generator.days);
    let seed = seed.unwrap_or(config.generator.seed);
    let generator = config.generator();
    generator.check_horizon(days)?;
    let series = generator.generate(&config.catalog(), days, seed);

    let mut out: Box<dyn Write> = match &output {
        Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
            format!("Failed to create output file: {}", path.display())
        })?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    for sample in &series {
        serde_json::to_writer(&mut out, sample).context("Failed to serialize sample")?;
        writeln!(out)?;
    }
    out.flush()?;

    if let Some(path) = output {
        tracing::info!(rows = series.len(), path = %path.display(), "wrote synthetic series");
    }
    Ok(())
}

fn features(config: &Config, days: Option<u32>, seed: Option<u64>) -> anyhow::Result<()> {
    let days = days.unwrap_or(config.generator.days);
    let seed = seed.unwrap_or(config.generator.seed);
    let generator = config.generator();
    generator.check_horizon(days)?;
    let series = generator.generate(&config.catalog(), days, seed);

    let table = series.to_table()?;
    let features = build_features(&table)?;

    let stdout = io::stdout().lock();
    serde_json::to_writer_pretty(stdout, &features).context("Failed to serialize features")?;
    println!();
    Ok(())
}

async fn locate(config: &Config, city: &str) -> anyhow::Result<GeoLocation> {
    let city = city.trim();
    if city.is_empty() {
        bail!("Enter a valid city name.");
    }

    let geocoder = Geocoder::from_config(&config.api)?;
    geocoder
        .search(city)
        .await?
        .with_context(|| format!("Could not find '{city}'. Try another name."))
}

async fn show(config: &Config, city: &str) -> anyhow::Result<()> {
    let location = locate(config, city).await?;
    println!("{}", output::location_line(&location));

    let provider = provider_from_config(config)?;
    let weather = provider
        .current_weather(location.lat, location.lon, &location.timezone)
        .await?;

    let sun = match sun_times(location.lat, location.lon, Utc::now().date_naive()) {
        Ok(sun) => Some(sun),
        Err(err) => {
            tracing::warn!("sun times unavailable: {err:#}");
            None
        }
    };
    let air = provider.current_air_quality(location.lat, location.lon).await;

    print!(
        "{}",
        output::current_cards(&location, &weather, sun.as_ref(), air.as_ref())
    );
    Ok(())
}

async fn forecast(config: &Config, city: &str, days: u32) -> anyhow::Result<()> {
    let location = locate(config, city).await?;
    println!("{}", output::location_line(&location));

    let provider = provider_from_config(config)?;
    let forecast = provider
        .daily_forecast(location.lat, location.lon, days)
        .await?;

    print!("{}", output::daily_table(&forecast));
    Ok(())
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    config.generator.days = CustomType::<u32>::new("Days to simulate:")
        .with_default(config.generator.days)
        .prompt()?;

    config.generator.seed = CustomType::<u64>::new("Random seed:")
        .with_default(config.generator.seed)
        .prompt()?;

    while Confirm::new("Add or update a city?").with_default(false).prompt()? {
        let name = Text::new("City name:").prompt()?;
        let lat = CustomType::<f64>::new("Latitude:").prompt()?;
        let lon = CustomType::<f64>::new("Longitude:").prompt()?;

        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            println!("Coordinates out of range, skipped.");
            continue;
        }
        config.set_city(&name, lat, lon);
    }

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}
