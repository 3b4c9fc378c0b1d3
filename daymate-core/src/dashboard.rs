//! Dashboard controller: owns the location, the fetch orchestrator, the clock
//! and the location-editing modal, and publishes [`DashboardState`] snapshots.

use chrono::Local;
use std::{sync::Arc, time::Duration};
use tokio::sync::watch;

use crate::{
    clock::ClockHandle,
    config::{Config, DEFAULT_CLOCK_PERIOD_SECS},
    error::DashboardError,
    geolocation::Geolocator,
    location::{Location, LocationStore},
    map::{DEFAULT_MAP_BASE, map_preview_url},
    model::DashboardState,
    orchestrator::{FetchOrchestrator, FetchTask},
    source::WeatherSource,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSettings {
    pub map_base_url: String,
    pub clock_period: Duration,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            map_base_url: DEFAULT_MAP_BASE.to_string(),
            clock_period: Duration::from_secs(DEFAULT_CLOCK_PERIOD_SECS),
        }
    }
}

impl From<&Config> for DashboardSettings {
    fn from(config: &Config) -> Self {
        Self { map_base_url: config.map_base_url().to_string(), clock_period: config.clock_period() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Open {
        draft: String,
    },
}

impl ModalState {
    pub fn is_open(&self) -> bool {
        matches!(self, ModalState::Open { .. })
    }
}

#[derive(Debug)]
pub struct Dashboard {
    store: LocationStore,
    orchestrator: Arc<FetchOrchestrator>,
    state: Arc<watch::Sender<DashboardState>>,
    settings: DashboardSettings,
    modal: ModalState,
    clock: Option<ClockHandle>,
}

impl Dashboard {
    pub fn new(
        store: LocationStore,
        source: Arc<dyn WeatherSource>,
        settings: DashboardSettings,
    ) -> Self {
        let location = store.current().clone();
        let map_url = map_preview_url(&settings.map_base_url, &location);
        let (tx, _rx) = watch::channel(DashboardState::new(location, map_url, Local::now()));
        let state = Arc::new(tx);
        let orchestrator = Arc::new(FetchOrchestrator::new(source, state.clone()));

        Self { store, orchestrator, state, settings, modal: ModalState::Closed, clock: None }
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    pub fn location(&self) -> &Location {
        self.store.current()
    }

    pub fn modal(&self) -> &ModalState {
        &self.modal
    }

    /// Start the clock and fetch for the current location.
    ///
    /// Only the first call does anything.
    pub fn mount(&mut self) -> Option<FetchTask> {
        if self.clock.is_some() {
            return None;
        }

        self.clock = Some(ClockHandle::spawn(self.settings.clock_period, self.state.clone()));
        self.orchestrator.trigger(self.store.current())
    }

    /// Fetch again for the current location, unless one is already pending.
    pub fn refresh(&self) -> Option<FetchTask> {
        self.orchestrator.trigger(self.store.current())
    }

    /// Open the modal with the current location as the draft.
    pub fn open_modal(&mut self) {
        self.modal = ModalState::Open { draft: self.store.current().to_string() };
    }

    /// Replace the draft text. Ignored while the modal is closed.
    pub fn edit_draft(&mut self, text: impl Into<String>) {
        if let ModalState::Open { draft } = &mut self.modal {
            *draft = text.into();
        }
    }

    /// Save the draft and close the modal.
    ///
    /// Confirming with the modal closed does nothing. On a storage failure the
    /// modal stays open with its draft.
    pub fn confirm(&mut self) -> Result<Option<FetchTask>, DashboardError> {
        let ModalState::Open { draft } = &self.modal else {
            return Ok(None);
        };

        let draft = draft.clone();
        let task = self.set_location(&draft)?;
        self.modal = ModalState::Closed;
        Ok(task)
    }

    /// Discard the draft and close the modal. The location is untouched.
    pub fn cancel(&mut self) {
        self.modal = ModalState::Closed;
    }

    /// Normalize and persist `raw`; fetch if the canonical location changed.
    pub fn set_location(&mut self, raw: &str) -> Result<Option<FetchTask>, DashboardError> {
        if !self.store.save(raw)? {
            return Ok(None);
        }

        let location = self.store.current().clone();
        let map_url = map_preview_url(&self.settings.map_base_url, &location);
        self.state.send_modify(|state| {
            state.location = location.clone();
            state.map_preview_url = map_url;
        });

        Ok(self.orchestrator.trigger(&location))
    }

    /// Use the device position as the location and close the modal.
    ///
    /// On failure nothing changes; the error carries the alert text.
    pub async fn use_device_location(
        &mut self,
        geolocator: &dyn Geolocator,
    ) -> Result<Option<FetchTask>, DashboardError> {
        let coords = geolocator.current_position().await.map_err(|err| {
            tracing::warn!(error = %err, "device location unavailable");
            err
        })?;

        let location = Location::from_coordinates(coords);
        if self.modal.is_open() {
            self.edit_draft(location.as_str());
        }

        let task = self.set_location(location.as_str())?;
        self.modal = ModalState::Closed;
        Ok(task)
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.orchestrator.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::{FetchError, GeolocationError},
        geolocation::{ConfiguredGeolocator, Coordinates},
        location::{DEFAULT_LOCATION, LOCATION_KEY},
        orchestrator::{FetchOutcome, FetchReport},
        source::SourceResponse,
        storage::{MemoryStorage, Storage},
    };
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::json;

    #[derive(Debug, Default)]
    struct RecordingSource {
        requested: Mutex<Vec<Location>>,
    }

    #[async_trait]
    impl WeatherSource for RecordingSource {
        async fn fetch(&self, location: &Location) -> Result<SourceResponse, FetchError> {
            self.requested.lock().push(location.clone());
            Ok(SourceResponse::Body(json!({ "recommendation": format!("Plan for {location}") })))
        }
    }

    fn dashboard_with(storage: Arc<MemoryStorage>) -> (Dashboard, Arc<RecordingSource>) {
        let source = Arc::new(RecordingSource::default());
        let dashboard =
            Dashboard::new(LocationStore::open(storage), source.clone(), DashboardSettings::default());
        (dashboard, source)
    }

    #[tokio::test]
    async fn mount_fetches_saved_location_once() {
        let storage = Arc::new(MemoryStorage::with_entry(LOCATION_KEY, " Lisbon "));
        let (mut dashboard, source) = dashboard_with(storage);

        let task = dashboard.mount().expect("initial fetch");
        assert!(dashboard.mount().is_none());
        assert_eq!(task.await.expect("join"), FetchReport::Applied(FetchOutcome::Live));

        assert_eq!(*source.requested.lock(), vec![Location::from("Lisbon")]);
        let state = dashboard.snapshot();
        assert_eq!(state.location.as_str(), "Lisbon");
        assert_eq!(state.display.recommendation, "Plan for Lisbon");
        assert!(state.map_preview_url.contains("q=Lisbon&output=embed"));
    }

    #[tokio::test]
    async fn open_modal_starts_with_current_location() {
        let (mut dashboard, _) = dashboard_with(Arc::new(MemoryStorage::new()));

        dashboard.open_modal();

        assert_eq!(dashboard.modal(), &ModalState::Open { draft: DEFAULT_LOCATION.to_string() });
    }

    #[tokio::test]
    async fn edit_draft_ignored_when_closed() {
        let (mut dashboard, _) = dashboard_with(Arc::new(MemoryStorage::new()));

        dashboard.edit_draft("Paris");

        assert_eq!(dashboard.modal(), &ModalState::Closed);
    }

    #[tokio::test]
    async fn confirm_persists_closes_and_fetches() {
        let storage = Arc::new(MemoryStorage::new());
        let (mut dashboard, source) = dashboard_with(storage.clone());

        dashboard.open_modal();
        dashboard.edit_draft("  Nairobi, KE  ");
        let task = dashboard.confirm().expect("confirm").expect("fetch triggered");
        task.await.expect("join");

        assert_eq!(dashboard.modal(), &ModalState::Closed);
        assert_eq!(dashboard.location().as_str(), "Nairobi, KE");
        assert_eq!(storage.get(LOCATION_KEY).expect("get").as_deref(), Some("Nairobi, KE"));
        assert_eq!(*source.requested.lock(), vec![Location::from("Nairobi, KE")]);
        assert!(dashboard.snapshot().map_preview_url.contains("Nairobi%2C%20KE"));
    }

    #[tokio::test]
    async fn confirm_unchanged_location_does_not_fetch() {
        let (mut dashboard, source) = dashboard_with(Arc::new(MemoryStorage::new()));

        dashboard.open_modal();
        let task = dashboard.confirm().expect("confirm");

        assert!(task.is_none());
        assert!(!dashboard.modal().is_open());
        assert!(source.requested.lock().is_empty());
    }

    #[tokio::test]
    async fn cancel_discards_draft() {
        let storage = Arc::new(MemoryStorage::new());
        let (mut dashboard, source) = dashboard_with(storage.clone());

        dashboard.open_modal();
        dashboard.edit_draft("Berlin");
        dashboard.cancel();

        assert_eq!(dashboard.modal(), &ModalState::Closed);
        assert_eq!(dashboard.location().as_str(), DEFAULT_LOCATION);
        assert_eq!(storage.get(LOCATION_KEY).expect("get"), None);
        assert!(source.requested.lock().is_empty());
    }

    #[tokio::test]
    async fn device_location_saves_coordinates() {
        let storage = Arc::new(MemoryStorage::new());
        let (mut dashboard, source) = dashboard_with(storage.clone());
        let geo = ConfiguredGeolocator::new(Some(Coordinates { latitude: 23.810_33, longitude: 90.412_52 }));

        dashboard.open_modal();
        let task = dashboard.use_device_location(&geo).await.expect("located").expect("fetch");
        task.await.expect("join");

        assert!(!dashboard.modal().is_open());
        assert_eq!(dashboard.location().as_str(), "23.8103,90.4125");
        assert_eq!(storage.get(LOCATION_KEY).expect("get").as_deref(), Some("23.8103,90.4125"));
        assert_eq!(*source.requested.lock(), vec![Location::from("23.8103,90.4125")]);
    }

    #[tokio::test]
    async fn unsupported_geolocation_leaves_state_alone() {
        let (mut dashboard, source) = dashboard_with(Arc::new(MemoryStorage::new()));

        dashboard.open_modal();
        let err = dashboard.use_device_location(&ConfiguredGeolocator::default()).await.unwrap_err();

        assert!(matches!(err, DashboardError::Geolocation(GeolocationError::Unsupported)));
        assert_eq!(err.alert(), "Geolocation is not supported.");
        assert!(dashboard.modal().is_open());
        assert_eq!(dashboard.location().as_str(), DEFAULT_LOCATION);
        assert!(source.requested.lock().is_empty());
    }

    #[test]
    fn settings_follow_config() {
        let config = Config {
            map_base_url: Some("http://maps.local/?q=".into()),
            clock_period_secs: Some(5),
            ..Config::default()
        };

        let settings = DashboardSettings::from(&config);

        assert_eq!(settings.map_base_url, "http://maps.local/?q=");
        assert_eq!(settings.clock_period, Duration::from_secs(5));
    }
}
