//! Core library for the `atmosphere` weather dashboard.
//!
//! This crate defines:
//! - The weather-code interpretation table and domain models
//! - Location, weather and language-model sources behind traits
//! - The refresh controller that turns them into one [`ViewState`]
//! - Configuration & credentials handling
//!
//! It is used by `atmosphere-cli`, but can also be driven by other front ends.

pub mod advice;
pub mod config;
pub mod controller;
pub mod interpretation;
pub mod location;
pub mod model;
pub mod provider;

pub use advice::{AdviceRequester, LanguageModel};
pub use config::{Config, LocationSource};
pub use controller::{Controller, RefreshError, ViewState};
pub use interpretation::Interpretation;
pub use location::{LocationError, LocationProvider};
pub use model::{Coordinates, ForecastSeries, Report, WeatherReading, WeatherSnapshot};
pub use provider::{WeatherError, WeatherProvider};

use std::sync::Arc;

/// Wire a [`Controller`] from config.
pub fn controller_from_config(config: &Config) -> Controller {
    Controller::new(
        Arc::from(location::location_from_config(&config.location)),
        Arc::from(provider::provider_from_config(&config.weather)),
        Arc::new(advice::advice_from_config(&config.advisor)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_location_fails_without_network() {
        let mut cfg = Config::default();
        cfg.location.source = LocationSource::None;
        // Unroutable endpoint: any request would error with a different message.
        cfg.weather.endpoint = "http://127.0.0.1:9/never".into();

        let controller = controller_from_config(&cfg);
        controller.refresh().await;

        assert_eq!(
            controller.state().error(),
            Some(RefreshError::GeolocationUnsupported.to_string().as_str())
        );
    }
}
