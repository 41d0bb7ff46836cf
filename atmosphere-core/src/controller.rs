//! Refresh cycle: locate → fetch weather → fetch advice → publish view state.

use serde::Serialize;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use tokio::sync::watch;

use crate::{
    advice::AdviceRequester,
    location::{LocationError, LocationProvider},
    model::Report,
    provider::{WeatherError, WeatherProvider},
};

/// What the dashboard should currently show.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum ViewState {
    Idle,
    Loading,
    Failed { reason: String },
    Ready(Box<Report>),
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn report(&self) -> Option<&Report> {
        match self {
            ViewState::Ready(report) => Some(report),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Failed { reason } => Some(reason),
            _ => None,
        }
    }
}

/// Why a refresh cycle ended without a report. `Display` is the user-facing text.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RefreshError {
    #[error("Geolocation is not supported by your browser.")]
    GeolocationUnsupported,
    #[error("Access to location denied. Please allow location to see local weather.")]
    LocationDenied,
    #[error("Failed to fetch weather data")]
    WeatherUnavailable,
    #[error("{0}")]
    Unexpected(String),
    /// A newer refresh started; this cycle's result is dropped.
    #[error("refresh superseded")]
    Superseded,
}

impl From<LocationError> for RefreshError {
    fn from(err: LocationError) -> Self {
        match err {
            LocationError::Unsupported => RefreshError::GeolocationUnsupported,
            LocationError::Denied(reason) => {
                tracing::debug!(%reason, "location denied");
                RefreshError::LocationDenied
            }
        }
    }
}

impl From<WeatherError> for RefreshError {
    fn from(err: WeatherError) -> Self {
        match err {
            WeatherError::Status(_) => RefreshError::WeatherUnavailable,
            other => RefreshError::Unexpected(other.to_string()),
        }
    }
}

/// Coordinates the three sources into one [`ViewState`].
///
/// Each call to [`Controller::refresh`] takes a new epoch. Results are only
/// published while their epoch is still the latest, so a slow, older cycle
/// can never overwrite a newer one.
#[derive(Debug)]
pub struct Controller {
    locator: Arc<dyn LocationProvider>,
    weather: Arc<dyn WeatherProvider>,
    advisor: Arc<AdviceRequester>,
    epoch: AtomicU64,
    state: watch::Sender<ViewState>,
}

impl Controller {
    pub fn new(
        locator: Arc<dyn LocationProvider>,
        weather: Arc<dyn WeatherProvider>,
        advisor: Arc<AdviceRequester>,
    ) -> Self {
        let (state, _) = watch::channel(ViewState::Idle);
        Self { locator, weather, advisor, epoch: AtomicU64::new(0), state }
    }

    /// Current view state.
    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every published change.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    /// Run one refresh cycle. Safe to call while another is in flight; the
    /// most recently started cycle wins.
    pub async fn refresh(&self) {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(epoch, "refresh started");

        self.publish(epoch, ViewState::Loading);

        let next = match self.run_cycle(epoch).await {
            Ok(report) => ViewState::Ready(Box::new(report)),
            Err(RefreshError::Superseded) => {
                tracing::debug!(epoch, "refresh superseded; discarding result");
                return;
            }
            Err(err) => {
                tracing::warn!(epoch, error = %err, "refresh failed");
                ViewState::Failed { reason: err.to_string() }
            }
        };

        if !self.publish(epoch, next) {
            tracing::debug!(epoch, "refresh superseded; discarding result");
        }
    }

    async fn run_cycle(&self, epoch: u64) -> Result<Report, RefreshError> {
        let at = self.locator.locate().await?;
        self.ensure_current(epoch)?;
        tracing::debug!(epoch, lat = at.latitude, lon = at.longitude, "location resolved");

        let snapshot = self.weather.fetch(at).await?;
        self.ensure_current(epoch)?;
        tracing::debug!(epoch, points = snapshot.forecast.len(), "weather fetched");

        let advice = self.advisor.get_advice(&snapshot.reading).await;

        Ok(Report { reading: snapshot.reading, forecast: snapshot.forecast, advice })
    }

    fn ensure_current(&self, epoch: u64) -> Result<(), RefreshError> {
        if self.epoch.load(Ordering::SeqCst) == epoch {
            Ok(())
        } else {
            Err(RefreshError::Superseded)
        }
    }

    /// Replace the view state if `epoch` is still the latest. Returns whether
    /// the state was written.
    fn publish(&self, epoch: u64, next: ViewState) -> bool {
        self.state.send_if_modified(|state| {
            if self.epoch.load(Ordering::SeqCst) != epoch {
                return false;
            }
            *state = next;
            true
        })
    }
}
