use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::model::{
    Coordinates, ForecastSeries, LocationLabel, WeatherReading, WeatherSnapshot,
};

use super::{WeatherError, WeatherProvider};

/// Open-Meteo forecast API. Keyless.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    endpoint: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), http: Client::new() }
    }
}

#[derive(Debug, Deserialize)]
struct OmCurrentWeather {
    temperature: f64,
    windspeed: f64,
    weathercode: i32,
    is_day: u8,
    time: String,
}

#[derive(Debug, Deserialize)]
struct OmHourly {
    time: Vec<String>,
    temperature_2m: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    current_weather: OmCurrentWeather,
    hourly: OmHourly,
}

impl From<OmResponse> for WeatherSnapshot {
    fn from(res: OmResponse) -> Self {
        let current = res.current_weather;

        WeatherSnapshot {
            reading: WeatherReading {
                temperature_c: current.temperature,
                wind_speed_kmh: current.windspeed,
                weather_code: current.weathercode,
                is_day: current.is_day == 1,
                observed_at: current.time,
                location: LocationLabel::placeholder(),
            },
            forecast: ForecastSeries::from_hourly(res.hourly.time, res.hourly.temperature_2m),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn fetch(&self, at: Coordinates) -> Result<WeatherSnapshot, WeatherError> {
        let res = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("latitude", at.latitude.to_string()),
                ("longitude", at.longitude.to_string()),
                ("current_weather", "true".to_string()),
                ("hourly", "temperature_2m".to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            tracing::warn!(%status, body = %truncate_body(&body), "Open-Meteo request failed");
            return Err(WeatherError::Status(status));
        }

        let body = res.text().await?;

        let parsed: OmResponse = serde_json::from_str(&body)
            .map_err(|e| WeatherError::Decode(format!("Failed to parse Open-Meteo JSON: {e}")))?;

        Ok(parsed.into())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
