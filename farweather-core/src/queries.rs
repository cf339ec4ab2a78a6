//! Cached, request-deduplicated access to the weather and geocoding
//! endpoints.
//!
//! Every fetch is keyed by its input parameters, so a stale in-flight
//! request can only ever populate an entry nobody reads; the freshest
//! user action always wins without transport-level cancellation.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tokio::time::Instant;
use tracing::debug;

use crate::api::open_meteo::{ApiError, OpenMeteoClient};
use crate::model::{Location, WeatherData, validate_coordinates};
use crate::retry::with_retry_capped;

/// How long a cached forecast is served without refetching.
pub const WEATHER_FRESH: Duration = Duration::from_secs(5 * 60);
/// Idle time after which a forecast entry is dropped entirely.
const WEATHER_IDLE_EVICT: Duration = Duration::from_secs(30 * 60);
/// How long cached search results are served without refetching.
pub const SEARCH_FRESH: Duration = Duration::from_secs(5 * 60);
/// Idle time after which a search entry is dropped entirely.
const SEARCH_IDLE_EVICT: Duration = Duration::from_secs(10 * 60);

const FETCH_RETRIES: u32 = 3;
const FETCH_BASE_DELAY: Duration = Duration::from_secs(1);
const FETCH_MAX_DELAY: Duration = Duration::from_secs(30);

/// Cache key: coordinates rounded to 1e-4 degrees (~11 m), so nearby
/// floating-point representations of "the same place" share one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordKey {
    lat_e4: i32,
    lon_e4: i32,
}

impl CoordKey {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            lat_e4: (latitude * 1e4).round() as i32,
            lon_e4: (longitude * 1e4).round() as i32,
        }
    }
}

#[derive(Clone)]
struct CachedWeather {
    data: Arc<WeatherData>,
    fetched_at: Instant,
}

#[derive(Clone)]
struct CachedSearch {
    results: Arc<Vec<Location>>,
    fetched_at: Instant,
}

/// The query layer: one instance shared by everything that fetches.
pub struct WeatherQueries {
    client: OpenMeteoClient,
    weather: Cache<CoordKey, CachedWeather>,
    search: Cache<String, CachedSearch>,
}

impl WeatherQueries {
    pub fn new(client: OpenMeteoClient) -> Self {
        Self {
            client,
            weather: Cache::builder()
                .max_capacity(64)
                .time_to_idle(WEATHER_IDLE_EVICT)
                .build(),
            search: Cache::builder()
                .max_capacity(256)
                .time_to_idle(SEARCH_IDLE_EVICT)
                .build(),
        }
    }

    /// Forecast for a coordinate pair, served from cache while fresh.
    ///
    /// Concurrent callers for one key share a single network call; a stale
    /// entry is invalidated and refetched.
    pub async fn weather(&self, latitude: f64, longitude: f64) -> Result<Arc<WeatherData>, ApiError> {
        if !validate_coordinates(latitude, longitude) {
            return Err(ApiError::InvalidCoordinates);
        }

        let key = CoordKey::new(latitude, longitude);
        if let Some(entry) = self.weather.get(&key).await {
            if entry.fetched_at.elapsed() < WEATHER_FRESH {
                debug!(%latitude, %longitude, "weather cache hit");
                return Ok(entry.data);
            }
            self.weather.invalidate(&key).await;
        }

        self.fetch_weather_into_cache(key, latitude, longitude).await
    }

    /// Drop any cached forecast for the pair and fetch anew.
    pub async fn refresh(&self, latitude: f64, longitude: f64) -> Result<Arc<WeatherData>, ApiError> {
        if !validate_coordinates(latitude, longitude) {
            return Err(ApiError::InvalidCoordinates);
        }

        let key = CoordKey::new(latitude, longitude);
        debug!(%latitude, %longitude, "refreshing weather");
        self.weather.invalidate(&key).await;
        self.fetch_weather_into_cache(key, latitude, longitude).await
    }

    async fn fetch_weather_into_cache(
        &self,
        key: CoordKey,
        latitude: f64,
        longitude: f64,
    ) -> Result<Arc<WeatherData>, ApiError> {
        let client = self.client.clone();
        let entry = self
            .weather
            .try_get_with(key, async move {
                let data = with_retry_capped(
                    || client.fetch_weather(latitude, longitude),
                    FETCH_RETRIES,
                    FETCH_BASE_DELAY,
                    FETCH_MAX_DELAY,
                )
                .await?;
                Ok::<_, ApiError>(CachedWeather {
                    data: Arc::new(data),
                    fetched_at: Instant::now(),
                })
            })
            .await
            .map_err(|e| (*e).clone())?;

        Ok(entry.data)
    }

    /// Location search keyed by the trimmed query, served from cache while
    /// fresh. Queries under two characters resolve empty without touching
    /// the network.
    pub async fn search(&self, query: &str) -> Result<Arc<Vec<Location>>, ApiError> {
        let trimmed = query.trim().to_string();
        if trimmed.chars().count() < 2 {
            return Ok(Arc::new(Vec::new()));
        }

        if let Some(entry) = self.search.get(&trimmed).await {
            if entry.fetched_at.elapsed() < SEARCH_FRESH {
                debug!(query = %trimmed, "search cache hit");
                return Ok(entry.results);
            }
            self.search.invalidate(&trimmed).await;
        }

        let client = self.client.clone();
        let query_for_fetch = trimmed.clone();
        let entry = self
            .search
            .try_get_with(trimmed, async move {
                let results = with_retry_capped(
                    || client.search_locations(&query_for_fetch),
                    FETCH_RETRIES,
                    FETCH_BASE_DELAY,
                    FETCH_MAX_DELAY,
                )
                .await?;
                Ok::<_, ApiError>(CachedSearch {
                    results: Arc::new(results),
                    fetched_at: Instant::now(),
                })
            })
            .await
            .map_err(|e| (*e).clone())?;

        Ok(entry.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearby_coordinates_share_a_key() {
        let a = CoordKey::new(48.85661, 2.35221);
        let b = CoordKey::new(48.856612, 2.352208);
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_places_get_distinct_keys() {
        let paris = CoordKey::new(48.8566, 2.3522);
        let tokyo = CoordKey::new(35.6762, 139.6503);
        assert_ne!(paris, tokyo);

        // A tenth of a degree apart is a different key.
        let nearby = CoordKey::new(48.9566, 2.3522);
        assert_ne!(paris, nearby);
    }

    #[tokio::test]
    async fn invalid_coordinates_never_hit_the_cache_or_network() {
        let mut config = crate::config::Config::default();
        config.forecast_base_url = "http://127.0.0.1:1".to_string();
        let queries = WeatherQueries::new(OpenMeteoClient::new(&config).expect("client"));

        let err = queries.weather(f64::NAN, 0.0).await.unwrap_err();
        assert_eq!(err, ApiError::InvalidCoordinates);

        let err = queries.refresh(0.0, 200.0).await.unwrap_err();
        assert_eq!(err, ApiError::InvalidCoordinates);
    }

    #[tokio::test]
    async fn short_search_queries_resolve_empty() {
        let mut config = crate::config::Config::default();
        config.geocoding_base_url = "http://127.0.0.1:1".to_string();
        let queries = WeatherQueries::new(OpenMeteoClient::new(&config).expect("client"));

        let results = queries.search("  p ").await.expect("empty result");
        assert!(results.is_empty());
    }
}
