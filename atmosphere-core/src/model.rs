use chrono::{DateTime, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::interpretation::{self, Interpretation};

/// Number of hourly points kept from the upstream series.
pub const FORECAST_HOURS: usize = 24;

/// Placeholder city shown until a real place name is resolved.
pub const PLACEHOLDER_CITY: &str = "Current Location";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationLabel {
    pub city: Option<String>,
    pub country: Option<String>,
}

impl LocationLabel {
    pub fn placeholder() -> Self {
        Self { city: Some(PLACEHOLDER_CITY.to_string()), country: None }
    }
}

/// Current conditions as reported by the weather provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature_c: f64,
    pub wind_speed_kmh: f64,
    pub weather_code: i32,
    pub is_day: bool,
    /// Local observation time, e.g. `2025-01-01T12:00`.
    pub observed_at: String,
    pub location: LocationLabel,
}

impl WeatherReading {
    /// Temperature rounded for display, halves rounding up.
    pub fn display_temperature(&self) -> i64 {
        (self.temperature_c + 0.5).floor() as i64
    }

    pub fn period(&self) -> &'static str {
        if self.is_day { "Daytime" } else { "Nighttime" }
    }

    pub fn interpretation(&self) -> Option<&'static Interpretation> {
        interpretation::lookup(self.weather_code)
    }
}

/// Hourly temperatures, at most [`FORECAST_HOURS`] long.
///
/// `times` and `temperatures` always have the same length; index `i` of one
/// belongs to index `i` of the other.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSeries {
    times: Vec<String>,
    temperatures: Vec<f64>,
}

impl ForecastSeries {
    /// Build a series from the upstream hourly vectors, keeping the leading
    /// entries only.
    pub fn from_hourly(mut times: Vec<String>, mut temperatures: Vec<f64>) -> Self {
        if times.len() != temperatures.len() {
            tracing::warn!(
                times = times.len(),
                temperatures = temperatures.len(),
                "hourly series lengths differ; truncating to the shorter one"
            );
        }

        let len = times.len().min(temperatures.len()).min(FORECAST_HOURS);
        times.truncate(len);
        temperatures.truncate(len);

        Self { times, temperatures }
    }

    pub fn times(&self) -> &[String] {
        &self.times
    }

    pub fn temperatures(&self) -> &[f64] {
        &self.temperatures
    }

    pub fn points(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.times.iter().map(String::as_str).zip(self.temperatures.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Hour-of-day axis labels (`"7:00"`), one per entry. Unparseable
    /// timestamps get `"--"`.
    pub fn hour_labels(&self) -> Vec<String> {
        self.times
            .iter()
            .map(|t| match hour_of(t) {
                Some(h) => format!("{h}:00"),
                None => "--".to_string(),
            })
            .collect()
    }
}

fn hour_of(timestamp: &str) -> Option<u32> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M") {
        return Some(dt.hour());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.hour());
    }
    DateTime::parse_from_rfc3339(timestamp).ok().map(|dt| dt.hour())
}

/// One decoded weather response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSnapshot {
    pub reading: WeatherReading,
    pub forecast: ForecastSeries,
}

/// Everything the dashboard shows once a refresh cycle succeeds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub reading: WeatherReading,
    pub forecast: ForecastSeries,
    pub advice: String,
}
