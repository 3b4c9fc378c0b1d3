use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{borrow::Cow, fmt, sync::Arc};

use crate::{geolocation::Coordinates, storage::Storage};

/// Location used whenever nothing (or only whitespace) was provided.
pub const DEFAULT_LOCATION: &str = "Dhaka, BD";

/// Storage key holding the last confirmed location.
pub const LOCATION_KEY: &str = "userLocation";

/// A normalized, free-text location: a place name or a `"lat,lon"` pair.
///
/// Always trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location(String);

impl Location {
    pub fn normalize(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(trimmed) if !trimmed.is_empty() => Location(trimmed.to_string()),
            _ => Location::default(),
        }
    }

    /// `"lat,lon"` with four decimals each.
    pub fn from_coordinates(coords: Coordinates) -> Self {
        Location(format!("{:.4},{:.4}", coords.latitude, coords.longitude))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Percent-encoded form, safe as a single path segment or query value.
    pub fn encoded(&self) -> Cow<'_, str> {
        urlencoding::encode(&self.0)
    }
}

impl Default for Location {
    fn default() -> Self {
        Location(DEFAULT_LOCATION.to_string())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Location {
    fn from(raw: &str) -> Self {
        Location::normalize(Some(raw))
    }
}

pub fn normalize(raw: Option<&str>) -> Location {
    Location::normalize(raw)
}

/// Canonical location, backed by persistent storage.
#[derive(Debug)]
pub struct LocationStore {
    storage: Arc<dyn Storage>,
    current: Location,
}

impl LocationStore {
    /// Read the persisted location, falling back to the default.
    ///
    /// An unreadable store is logged and treated as empty.
    pub fn open(storage: Arc<dyn Storage>) -> Self {
        let saved = storage.get(LOCATION_KEY).unwrap_or_else(|err| {
            tracing::warn!("could not read saved location: {err:#}");
            None
        });
        let current = normalize(saved.as_deref());

        Self { storage, current }
    }

    pub fn current(&self) -> &Location {
        &self.current
    }

    /// Normalize and persist `raw`, then make it canonical.
    ///
    /// Returns whether the canonical location changed.
    pub fn save(&mut self, raw: &str) -> Result<bool> {
        let location = normalize(Some(raw));
        self.storage.set(LOCATION_KEY, location.as_str())?;

        if location == self.current {
            return Ok(false);
        }

        tracing::info!(from = %self.current, to = %location, "location changed");
        self.current = location;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn empty_inputs_fall_back_to_default() {
        assert_eq!(normalize(Some("")).as_str(), DEFAULT_LOCATION);
        assert_eq!(normalize(None).as_str(), DEFAULT_LOCATION);
        assert_eq!(normalize(Some("   ")).as_str(), DEFAULT_LOCATION);
        assert_eq!(normalize(Some("\t\n")).as_str(), DEFAULT_LOCATION);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(normalize(Some("  Paris  ")).as_str(), "Paris");
        assert_eq!(normalize(Some(" New York, US ")).as_str(), "New York, US");
    }

    #[test]
    fn normalize_is_idempotent() {
        for raw in ["Paris", "  Paris  ", "", "23.8103,90.4125", "Dhaka, BD"] {
            let once = normalize(Some(raw));
            let twice = normalize(Some(once.as_str()));
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn coordinates_use_four_decimals() {
        let loc = Location::from_coordinates(Coordinates { latitude: 23.810_33, longitude: 90.4 });
        assert_eq!(loc.as_str(), "23.8103,90.4000");

        let loc = Location::from_coordinates(Coordinates { latitude: -33.8688, longitude: -151.20929 });
        assert_eq!(loc.as_str(), "-33.8688,-151.2093");
    }

    #[test]
    fn encoded_escapes_spaces_and_commas() {
        assert_eq!(Location::from("Dhaka, BD").encoded(), "Dhaka%2C%20BD");
        assert_eq!(Location::from("São Paulo").encoded(), "S%C3%A3o%20Paulo");
    }

    #[test]
    fn open_without_saved_value_uses_default() {
        let store = LocationStore::open(Arc::new(MemoryStorage::new()));
        assert_eq!(store.current().as_str(), DEFAULT_LOCATION);
    }

    #[test]
    fn open_normalizes_saved_value() {
        let storage = MemoryStorage::with_entry(LOCATION_KEY, "  Berlin ");
        let store = LocationStore::open(Arc::new(storage));
        assert_eq!(store.current().as_str(), "Berlin");
    }

    #[test]
    fn open_with_blank_saved_value_uses_default() {
        let storage = MemoryStorage::with_entry(LOCATION_KEY, "  ");
        let store = LocationStore::open(Arc::new(storage));
        assert_eq!(store.current().as_str(), DEFAULT_LOCATION);
    }

    #[test]
    fn save_persists_trimmed_value() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = LocationStore::open(storage.clone());

        let changed = store.save("  Tokyo  ").expect("save");

        assert!(changed);
        assert_eq!(store.current().as_str(), "Tokyo");
        assert_eq!(storage.get(LOCATION_KEY).expect("get").as_deref(), Some("Tokyo"));
    }

    #[test]
    fn save_same_location_reports_unchanged() {
        let storage = Arc::new(MemoryStorage::with_entry(LOCATION_KEY, "Tokyo"));
        let mut store = LocationStore::open(storage);

        assert!(!store.save(" Tokyo").expect("save"));
    }

    #[test]
    fn save_blank_restores_default() {
        let storage = Arc::new(MemoryStorage::with_entry(LOCATION_KEY, "Tokyo"));
        let mut store = LocationStore::open(storage.clone());

        assert!(store.save("").expect("save"));
        assert_eq!(store.current().as_str(), DEFAULT_LOCATION);
        assert_eq!(storage.get(LOCATION_KEY).expect("get").as_deref(), Some(DEFAULT_LOCATION));
    }
}
