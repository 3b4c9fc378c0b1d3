//! Keeps the displayed weather/news in sync with the canonical location.
//!
//! One request is issued per trigger. A trigger for a location that already
//! has a pending request is ignored; a trigger for a different location is
//! not. Every request carries an epoch, and only the latest epoch may write
//! display state, so a slow answer for an old location never overwrites a
//! newer one.

use parking_lot::Mutex;
use reqwest::StatusCode;
use std::sync::Arc;
use tokio::{sync::watch, task::JoinHandle};

use crate::{
    location::Location,
    mock,
    model::{DashboardState, DisplayData, WeatherPayload},
    source::{SourceResponse, WeatherSource},
};

/// Recommendation text shown while a fetch is pending.
pub const LOADING_SENTINEL: &str = "Loading..";

pub type FetchTask = JoinHandle<FetchReport>;

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Server data applied, with per-field fallbacks.
    Live,
    /// Non-success status; mock data applied.
    Fallback(StatusCode),
    /// Transport or body failure; display state left as it was.
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchReport {
    Applied(FetchOutcome),
    /// A newer request started before this one settled.
    Stale,
    /// The orchestrator was shut down while the request was pending.
    Detached,
}

/// Permission to run one request, handed out by [`FetchOrchestrator::begin`].
#[derive(Debug)]
pub struct Ticket {
    location: Location,
    epoch: u64,
}

impl Ticket {
    pub fn location(&self) -> &Location {
        &self.location
    }
}

#[derive(Debug, Default)]
struct Flight {
    epoch: u64,
    pending: Option<(Location, u64)>,
    detached: bool,
}

#[derive(Debug)]
pub struct FetchOrchestrator {
    source: Arc<dyn WeatherSource>,
    state: Arc<watch::Sender<DashboardState>>,
    flight: Mutex<Flight>,
}

impl FetchOrchestrator {
    pub fn new(source: Arc<dyn WeatherSource>, state: Arc<watch::Sender<DashboardState>>) -> Self {
        Self { source, state, flight: Mutex::new(Flight::default()) }
    }

    /// Claim the request slot for `location` and mark the dashboard as loading.
    ///
    /// Returns `None` when a request for the same location is still pending
    /// or after [`shutdown`](Self::shutdown).
    pub fn begin(&self, location: &Location) -> Option<Ticket> {
        let mut flight = self.flight.lock();

        if flight.detached {
            return None;
        }
        if flight.pending.as_ref().is_some_and(|(pending, _)| pending == location) {
            tracing::debug!(%location, "fetch already in flight, ignoring trigger");
            return None;
        }

        flight.epoch += 1;
        let epoch = flight.epoch;
        flight.pending = Some((location.clone(), epoch));

        self.state.send_modify(|state| {
            state.loading = true;
            state.display.recommendation = LOADING_SENTINEL.to_string();
        });

        Some(Ticket { location: location.clone(), epoch })
    }

    /// Perform the request for `ticket` and apply its result.
    pub async fn run(&self, ticket: Ticket) -> FetchReport {
        tracing::info!(location = %ticket.location, epoch = ticket.epoch, "fetching weather");

        let result = self.source.fetch(&ticket.location).await;

        let mut flight = self.flight.lock();
        if flight.pending.as_ref().is_some_and(|(_, epoch)| *epoch == ticket.epoch) {
            flight.pending = None;
        }

        if flight.detached {
            tracing::debug!(location = %ticket.location, "dashboard gone, dropping fetch result");
            return FetchReport::Detached;
        }

        let outcome = match &result {
            Ok(SourceResponse::Status(status)) => {
                tracing::warn!(location = %ticket.location, %status, "falling back to mock data");
                FetchOutcome::Fallback(*status)
            }
            Ok(SourceResponse::Body(_)) => FetchOutcome::Live,
            Err(err) => {
                tracing::error!(location = %ticket.location, error = %err, "weather fetch failed");
                FetchOutcome::Failed
            }
        };

        if flight.epoch != ticket.epoch {
            tracing::debug!(
                location = %ticket.location,
                epoch = ticket.epoch,
                latest = flight.epoch,
                "discarding stale fetch result"
            );
            return FetchReport::Stale;
        }

        self.state.send_modify(|state| {
            match &result {
                Ok(SourceResponse::Status(_)) => apply_fallback(&mut state.display),
                Ok(SourceResponse::Body(body)) => {
                    apply_payload(&mut state.display, WeatherPayload::from_json(body))
                }
                Err(_) => {}
            }
            state.loading = false;
        });
        drop(flight);

        FetchReport::Applied(outcome)
    }

    /// [`begin`](Self::begin) and, if granted, run the request on the runtime.
    pub fn trigger(self: &Arc<Self>, location: &Location) -> Option<FetchTask> {
        let ticket = self.begin(location)?;
        let this = Arc::clone(self);
        Some(tokio::spawn(async move { this.run(ticket).await }))
    }

    pub fn is_pending(&self, location: &Location) -> bool {
        self.flight.lock().pending.as_ref().is_some_and(|(pending, _)| pending == location)
    }

    /// Stop applying results; pending requests settle into [`FetchReport::Detached`].
    pub fn shutdown(&self) {
        self.flight.lock().detached = true;
    }
}

/// Non-success path. The recommendation keeps the loading sentinel.
fn apply_fallback(display: &mut DisplayData) {
    display.current = Some(mock::current());
    display.hourly = mock::hourly();
    display.daily = mock::daily7();
    display.aqi = mock::aqi();
    display.news = mock::news();
}

fn apply_payload(display: &mut DisplayData, payload: WeatherPayload) {
    display.current = Some(payload.current.unwrap_or_else(mock::current));
    display.hourly = payload.hourly.unwrap_or_else(mock::hourly);
    display.daily = payload.daily7.unwrap_or_else(mock::daily7);
    display.aqi = payload.aqi.or_else(mock::aqi);
    display.recommendation = payload.recommendation.unwrap_or_default();
    display.news = if payload.news.is_empty() { mock::news() } else { payload.news };
}
