//! Open-Meteo forecast and geocoding client.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

use crate::api::body_excerpt;
use crate::config::Config;
use crate::model::{Location, WeatherData, validate_coordinates};

/// Fields requested for the point-in-time snapshot.
const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,is_day,\
    precipitation,rain,showers,snowfall,weather_code,cloud_cover,pressure_msl,surface_pressure,\
    wind_speed_10m,wind_direction_10m,wind_gusts_10m";

/// Fields requested at hourly resolution.
const HOURLY_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,\
    precipitation_probability,precipitation,rain,showers,snowfall,weather_code,pressure_msl,\
    cloud_cover,visibility,wind_speed_10m,wind_direction_10m,wind_gusts_10m";

/// Fields requested as daily aggregates.
const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,\
    apparent_temperature_max,apparent_temperature_min,sunrise,sunset,daylight_duration,\
    sunshine_duration,uv_index_max,precipitation_sum,rain_sum,showers_sum,snowfall_sum,\
    precipitation_hours,precipitation_probability_max,wind_speed_10m_max,wind_gusts_10m_max,\
    wind_direction_10m_dominant";

const FORECAST_DAYS: u8 = 7;

/// User-facing weather/geocoding failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// A geocoding call could not be completed.
    #[error("Failed to search locations. Please check your internet connection.")]
    SearchFailed,

    /// A forecast fetch could not be completed.
    #[error("Failed to fetch weather data. Please check your internet connection.")]
    FetchFailed,

    /// Coordinates outside the valid lat/lon ranges.
    #[error("Invalid location coordinates")]
    InvalidCoordinates,
}

/// HTTP client for the forecast and geocoding endpoints.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: Client,
    forecast_base: String,
    geocoding_base: String,
}

impl OpenMeteoClient {
    /// Build a client from config.
    ///
    /// # Errors
    ///
    /// Fails only if the underlying HTTP client cannot be constructed.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            forecast_base: config.forecast_base_url.clone(),
            geocoding_base: config.geocoding_base_url.clone(),
        })
    }

    /// Search for locations by name.
    ///
    /// Queries under two characters never reach the network and yield an
    /// empty list.
    pub async fn search_locations(&self, query: &str) -> Result<Vec<Location>, ApiError> {
        let query = query.trim();
        if query.chars().count() < 2 {
            return Ok(Vec::new());
        }

        let url = format!("{}/search", self.geocoding_base);
        debug!(%query, "searching locations");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("name", query),
                ("count", "10"),
                ("language", "en"),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "geocoding request failed");
                ApiError::SearchFailed
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, body = %body_excerpt(&body), "geocoding returned error status");
            return Err(ApiError::SearchFailed);
        }

        let parsed: GeocodingResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "failed to parse geocoding response");
            ApiError::SearchFailed
        })?;

        Ok(parsed
            .results
            .unwrap_or_default()
            .into_iter()
            .map(GeocodingResult::into_location)
            .collect())
    }

    /// Resolve coordinates to the nearest named place, if any.
    pub async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<Location>, ApiError> {
        let url = format!("{}/search", self.geocoding_base);
        debug!(%latitude, %longitude, "reverse geocoding");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("count", "1".to_string()),
                ("language", "en".to_string()),
                ("format", "json".to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "reverse geocoding request failed");
                ApiError::SearchFailed
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, body = %body_excerpt(&body), "reverse geocoding returned error status");
            return Err(ApiError::SearchFailed);
        }

        let parsed: GeocodingResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "failed to parse reverse geocoding response");
            ApiError::SearchFailed
        })?;

        Ok(parsed
            .results
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(GeocodingResult::into_location))
    }

    /// Fetch the full forecast snapshot for validated coordinates.
    ///
    /// Requests current conditions, hourly values for the whole window, and
    /// 7-day daily aggregates in a single call; the server resolves the
    /// location's timezone.
    pub async fn fetch_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherData, ApiError> {
        if !validate_coordinates(latitude, longitude) {
            return Err(ApiError::InvalidCoordinates);
        }

        let url = format!("{}/forecast", self.forecast_base);
        debug!(%latitude, %longitude, "fetching weather");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("hourly", HOURLY_FIELDS.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("timezone", "auto".to_string()),
                ("forecast_days", FORECAST_DAYS.to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "weather request failed");
                ApiError::FetchFailed
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, body = %body_excerpt(&body), "weather endpoint returned error status");
            return Err(ApiError::FetchFailed);
        }

        let data: WeatherData = response.json().await.map_err(|e| {
            warn!(error = %e, "failed to parse weather response");
            ApiError::FetchFailed
        })?;

        if !data.alignment_ok() {
            warn!("weather response has misaligned series arrays");
            return Err(ApiError::FetchFailed);
        }

        Ok(data)
    }
}

#[derive(Debug, serde::Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, serde::Deserialize)]
struct GeocodingResult {
    name: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    admin1: Option<String>,
}

impl GeocodingResult {
    fn into_location(self) -> Location {
        Location {
            name: self.name,
            latitude: self.latitude,
            longitude: self.longitude,
            country: self.country,
            admin1: self.admin1,
        }
    }
}
