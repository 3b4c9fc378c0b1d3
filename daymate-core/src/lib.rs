//! Core library for the DayMate weather dashboard.
//!
//! This crate defines:
//! - The persisted, normalized location and its storage
//! - The fetch orchestrator keeping weather/news state in sync with the location
//! - Fallback (mock) data used when the remote endpoint fails or omits fields
//! - The dashboard controller (modal state machine, clock, map preview)
//! - Configuration handling
//!
//! It is used by `daymate-cli`, but can also be reused by other hosts.

pub mod clock;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod geolocation;
pub mod location;
pub mod map;
pub mod mock;
pub mod model;
pub mod orchestrator;
pub mod source;
pub mod storage;

pub use config::{Config, DeviceConfig};
pub use dashboard::{Dashboard, DashboardSettings, ModalState};
pub use error::{DashboardError, FetchError, GeolocationError};
pub use geolocation::{ConfiguredGeolocator, Coordinates, Geolocator};
pub use location::{DEFAULT_LOCATION, Location, LocationStore, normalize};
pub use model::{DailyEntry, DashboardState, DisplayData, HourlyEntry, NewsItem, WeatherSnapshot};
pub use orchestrator::{FetchOrchestrator, FetchOutcome, FetchReport, FetchTask, LOADING_SENTINEL};
pub use source::{HttpWeatherSource, SourceResponse, WeatherSource};
pub use storage::{FileStorage, MemoryStorage, Storage};
