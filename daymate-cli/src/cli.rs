use anyhow::Context;
use clap::{Parser, Subcommand};
use daymate_core::{
    Config, ConfiguredGeolocator, Coordinates, Dashboard, DashboardSettings, FileStorage,
    Geolocator, HttpWeatherSource, Location, LocationStore, MemoryStorage, Storage,
    location::LOCATION_KEY,
};
use inquire::{CustomType, Text};
use std::sync::Arc;

use crate::{interactive, view::DashboardView};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "daymate", version, about = "DayMate weather dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the dashboard for the saved location (default).
    Dashboard {
        /// Render once after the first fetch and exit.
        #[arg(long)]
        once: bool,
    },

    /// Show the dashboard for a location without saving it.
    Show {
        /// Place name or "lat,lon"; the saved location when absent.
        location: Option<String>,
    },

    /// Print or change the saved location.
    Location {
        #[command(subcommand)]
        action: Option<LocationAction>,
    },

    /// Configure the weather endpoint and the device position.
    Configure,
}

#[derive(Debug, Subcommand)]
pub enum LocationAction {
    /// Save a new location.
    Set {
        /// Place name or "lat,lon".
        location: String,
    },

    /// Save the configured device position as the location.
    Locate,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command.unwrap_or(Command::Dashboard { once: false }) {
            Command::Dashboard { once } => {
                let storage = Arc::new(FileStorage::open_default()?);
                let dashboard = build_dashboard(&config, storage);
                interactive::run(dashboard, ConfiguredGeolocator::from_config(&config), once).await?;
            }
            Command::Show { location } => {
                let storage: Arc<dyn Storage> = match location {
                    Some(raw) => Arc::new(MemoryStorage::with_entry(LOCATION_KEY, &raw)),
                    None => Arc::new(FileStorage::open_default()?),
                };
                let mut dashboard = build_dashboard(&config, storage);
                if let Some(task) = dashboard.mount() {
                    task.await.context("weather fetch task failed")?;
                }
                println!("{}", DashboardView::new(&dashboard.snapshot()));
            }
            Command::Location { action } => {
                let mut store = LocationStore::open(Arc::new(FileStorage::open_default()?));
                match action {
                    None => println!("{}", store.current()),
                    Some(LocationAction::Set { location }) => {
                        store.save(&location)?;
                        println!("Location saved: {}", store.current());
                    }
                    Some(LocationAction::Locate) => {
                        let geolocator = ConfiguredGeolocator::from_config(&config);
                        match geolocator.current_position().await {
                            Ok(coords) => {
                                store.save(Location::from_coordinates(coords).as_str())?;
                                println!("Location saved: {}", store.current());
                            }
                            Err(err) => eprintln!("{}", err.alert()),
                        }
                    }
                }
            }
            Command::Configure => configure(config).await?,
        }

        Ok(())
    }
}

fn build_dashboard(config: &Config, storage: Arc<dyn Storage>) -> Dashboard {
    let source = Arc::new(HttpWeatherSource::from_config(config));
    Dashboard::new(LocationStore::open(storage), source, DashboardSettings::from(config))
}

async fn configure(mut config: Config) -> anyhow::Result<()> {
    let config = tokio::task::spawn_blocking(move || -> anyhow::Result<Config> {
        let api = Text::new("Weather API base URL:")
            .with_initial_value(config.api_base_url())
            .prompt()?;
        config.api_base_url = Some(api.trim().to_string());

        let latitude = CustomType::<f64>::new("Device latitude (Esc to skip):")
            .with_error_message("Please enter a number")
            .prompt_skippable()?;
        let longitude = match latitude {
            Some(_) => CustomType::<f64>::new("Device longitude:")
                .with_error_message("Please enter a number")
                .prompt_skippable()?,
            None => None,
        };

        if let (Some(latitude), Some(longitude)) = (latitude, longitude) {
            let coords = Coordinates { latitude, longitude };
            anyhow::ensure!(coords.is_valid(), "Coordinates {latitude},{longitude} are out of range");
            config.set_device_coordinates(Some(coords));
        }

        Ok(config)
    })
    .await??;

    config.save()?;
    println!("Configuration saved to {}", Config::config_file_path()?.display());
    Ok(())
}
