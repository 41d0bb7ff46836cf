//! Sources of the device position.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;

use crate::{
    config::{LocationConfig, LocationSource},
    model::Coordinates,
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocationError {
    /// The platform offers no way to determine position.
    #[error("location capability is not available")]
    Unsupported,
    /// Permission was refused or the platform failed to produce a fix.
    #[error("location request denied: {0}")]
    Denied(String),
}

#[async_trait]
pub trait LocationProvider: Send + Sync + Debug {
    async fn locate(&self) -> Result<Coordinates, LocationError>;
}

/// Always answers with the same coordinates.
#[derive(Debug, Clone)]
pub struct FixedLocation {
    at: Coordinates,
}

impl FixedLocation {
    pub fn new(at: Coordinates) -> Self {
        Self { at }
    }
}

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        Ok(self.at)
    }
}

/// A platform without a location capability.
#[derive(Debug, Clone, Default)]
pub struct NoLocation;

#[async_trait]
impl LocationProvider for NoLocation {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::Unsupported)
    }
}

/// Coarse geolocation derived from the public IP address.
#[derive(Debug, Clone)]
pub struct IpLocator {
    endpoint: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl IpLocator {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), http: Client::new() }
    }
}

#[async_trait]
impl LocationProvider for IpLocator {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        let res = self
            .http
            .get(&self.endpoint)
            .query(&[("fields", "status,message,lat,lon")])
            .send()
            .await
            .map_err(|e| LocationError::Denied(format!("IP lookup failed: {e}")))?;

        if !res.status().is_success() {
            return Err(LocationError::Denied(format!(
                "IP lookup returned status {}",
                res.status()
            )));
        }

        let body: IpApiResponse = res
            .json()
            .await
            .map_err(|e| LocationError::Denied(format!("IP lookup parse error: {e}")))?;

        match (body.status.as_str(), body.lat, body.lon) {
            ("success", Some(lat), Some(lon)) => {
                tracing::debug!(lat, lon, "located via IP");
                Ok(Coordinates::new(lat, lon))
            }
            _ => Err(LocationError::Denied(
                body.message.unwrap_or_else(|| "IP lookup gave no position".to_string()),
            )),
        }
    }
}

/// Construct the location provider selected in config.
pub fn location_from_config(config: &LocationConfig) -> Box<dyn LocationProvider> {
    match config.source {
        LocationSource::Ip => Box::new(IpLocator::new(config.endpoint.clone())),
        LocationSource::Fixed => match config.coordinates() {
            Some(at) => Box::new(FixedLocation::new(at)),
            None => {
                tracing::warn!("fixed location source without coordinates; location unavailable");
                Box::new(NoLocation)
            }
        },
        LocationSource::None => Box::new(NoLocation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn fixed_location_returns_its_coordinates() {
        let loc = FixedLocation::new(Coordinates::new(40.0, -74.0));
        assert_eq!(loc.locate().await, Ok(Coordinates::new(40.0, -74.0)));
    }

    #[tokio::test]
    async fn no_location_is_unsupported() {
        assert_eq!(NoLocation.locate().await, Err(LocationError::Unsupported));
    }

    #[tokio::test]
    async fn ip_locator_reads_coordinates() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/json"))
            .and(query_param("fields", "status,message,lat,lon"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success",
                "lat": 52.37,
                "lon": 4.89
            })))
            .mount(&mock_server)
            .await;

        let locator = IpLocator::new(format!("{}/json", mock_server.uri()));
        let at = locator.locate().await.expect("should locate");

        assert_eq!(at, Coordinates::new(52.37, 4.89));
    }

    #[tokio::test]
    async fn ip_locator_failure_is_denied() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "fail",
                "message": "reserved range"
            })))
            .mount(&mock_server)
            .await;

        let locator = IpLocator::new(mock_server.uri());
        let err = locator.locate().await.unwrap_err();

        assert_eq!(err, LocationError::Denied("reserved range".to_string()));
    }

    #[tokio::test]
    async fn ip_locator_http_error_is_denied() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let locator = IpLocator::new(mock_server.uri());
        assert!(matches!(locator.locate().await, Err(LocationError::Denied(_))));
    }

    #[tokio::test]
    async fn fixed_source_without_coordinates_is_unsupported() {
        let cfg = LocationConfig { source: LocationSource::Fixed, ..LocationConfig::default() };
        let provider = location_from_config(&cfg);
        assert_eq!(provider.locate().await, Err(LocationError::Unsupported));
    }

    #[tokio::test]
    async fn fixed_source_uses_configured_coordinates() {
        let mut cfg = LocationConfig::default();
        cfg.set_fixed(Coordinates::new(-33.9, 151.2));

        let provider = location_from_config(&cfg);
        assert_eq!(provider.locate().await, Ok(Coordinates::new(-33.9, 151.2)));
    }
}
