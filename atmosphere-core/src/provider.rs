use crate::{
    config::WeatherConfig,
    model::{Coordinates, WeatherSnapshot},
    provider::open_meteo::OpenMeteoProvider,
};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::fmt::Debug;

pub mod open_meteo;

#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    /// The weather API answered with a non-success status.
    #[error("Failed to fetch weather data")]
    Status(StatusCode),
    #[error("{0}")]
    Request(#[from] reqwest::Error),
    #[error("{0}")]
    Decode(String),
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions plus the hourly temperature series for `at`.
    async fn fetch(&self, at: Coordinates) -> Result<WeatherSnapshot, WeatherError>;
}

/// Construct the weather provider from config.
pub fn provider_from_config(config: &WeatherConfig) -> Box<dyn WeatherProvider> {
    Box::new(OpenMeteoProvider::new(config.endpoint.clone()))
}
