//! The app coordinator.
//!
//! Owns the single current location and wires the state machine to the
//! store, the query layer, the debounced search, and the external-service
//! clients. Front-ends call the event methods here and render whatever
//! [`WeatherApp::navigation`] says is showing.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::api::alerts::{AlertClient, AlertError, RainAlertPreferences};
use crate::api::directory::{DirectoryClient, ProfileLocationError};
use crate::api::open_meteo::{ApiError, OpenMeteoClient};
use crate::config::Config;
use crate::host::HostContext;
use crate::model::{Location, WeatherData};
use crate::queries::WeatherQueries;
use crate::search::{SearchDebouncer, SearchState};
use crate::state::{AppState, NavigationState, PermissionState};
use crate::store::LocationStore;

pub struct WeatherApp {
    state: AppState,
    location: Option<Location>,
    store: LocationStore,
    client: OpenMeteoClient,
    queries: Arc<WeatherQueries>,
    directory: DirectoryClient,
    alerts: AlertClient,
    host: Arc<dyn HostContext>,
    search: SearchDebouncer,
}

impl WeatherApp {
    /// Build the coordinator and decide the initial screen.
    ///
    /// The persisted location is read here, before the first navigation
    /// decision: a valid saved record opens straight onto the forecast.
    pub fn new(config: &Config, store: LocationStore, host: Arc<dyn HostContext>) -> Result<Self> {
        let client = OpenMeteoClient::new(config)?;
        let queries = Arc::new(WeatherQueries::new(client.clone()));
        let search = SearchDebouncer::new(Arc::clone(&queries));

        let location = store.load();
        let state = AppState::at_startup(location.is_some());

        Ok(Self {
            state,
            location,
            store,
            client,
            queries,
            directory: DirectoryClient::new(config)?,
            alerts: AlertClient::new(config)?,
            host,
            search,
        })
    }

    pub fn navigation(&self) -> NavigationState {
        self.state.navigation()
    }

    pub fn permission(&self) -> PermissionState {
        self.state.permission()
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// "Use my profile location": run the directory lookup and land on the
    /// forecast when it resolves.
    pub async fn request_current_location(&mut self) -> Result<(), ProfileLocationError> {
        self.state.request_current_location();
        self.resolve_profile_location().await
    }

    /// "Try again" after a failed lookup.
    pub async fn retry_current_location(&mut self) -> Result<(), ProfileLocationError> {
        self.state.retry_current_location();
        self.resolve_profile_location().await
    }

    async fn resolve_profile_location(&mut self) -> Result<(), ProfileLocationError> {
        let viewer = self.host.viewer().await;
        match self.directory.profile_location(viewer.as_ref()).await {
            Ok(profile) => {
                let location = self
                    .name_profile_location(profile.latitude, profile.longitude, profile.address)
                    .await;
                self.adopt_location(location);
                Ok(())
            }
            Err(e) => {
                match e {
                    ProfileLocationError::LocationNotSet => self.state.permission_denied(),
                    _ => self.state.permission_errored(),
                }
                Err(e)
            }
        }
    }

    /// Give a profile coordinate pair a display name: the profile address
    /// when present, the nearest geocoded place otherwise, and a generic
    /// label when even that fails.
    async fn name_profile_location(
        &self,
        latitude: f64,
        longitude: f64,
        address: Option<String>,
    ) -> Location {
        if let Some(address) = address {
            return Location::new(address, latitude, longitude);
        }

        match self.client.reverse_geocode(latitude, longitude).await {
            Ok(Some(mut nearest)) => {
                nearest.latitude = latitude;
                nearest.longitude = longitude;
                nearest
            }
            Ok(None) => Location::new("Profile Location", latitude, longitude),
            Err(e) => {
                debug!(error = %e, "reverse geocode for profile location failed");
                Location::new("Profile Location", latitude, longitude)
            }
        }
    }

    /// "Search for a city".
    pub fn start_search(&mut self) {
        self.state.start_search();
        self.search.reset();
    }

    /// Forward the latest search input to the debouncer.
    pub fn set_search_query(&mut self, query: &str) {
        self.search.set_query(query);
    }

    pub fn search_state(&self) -> SearchState {
        self.search.state()
    }

    pub fn search_updates(&self) -> watch::Receiver<SearchState> {
        self.search.subscribe()
    }

    /// A search result was picked.
    pub fn select_location(&mut self, location: Location) {
        self.adopt_location(location);
    }

    fn adopt_location(&mut self, location: Location) {
        debug!(name = %location.name, "location selected");
        self.store.set(Some(&location));
        self.location = Some(location);
        self.state.location_resolved();
        self.search.reset();
    }

    /// Back to the landing screen, abandoning in-flight work.
    pub fn go_home(&mut self) {
        self.state.go_home();
        self.search.reset();
    }

    /// Forget the selected location entirely.
    pub fn clear_location(&mut self) {
        self.location = None;
        self.store.set(None);
        self.state.clear_location();
        self.search.reset();
    }

    /// Forecast for the current location, served from cache while fresh.
    pub async fn weather(&self) -> Result<Arc<WeatherData>, ApiError> {
        let location = self.current_location_for_fetch()?;
        self.queries
            .weather(location.latitude, location.longitude)
            .await
    }

    /// Drop the cached forecast for the current location and refetch.
    pub async fn refresh_weather(&self) -> Result<Arc<WeatherData>, ApiError> {
        let location = self.current_location_for_fetch()?;
        self.queries
            .refresh(location.latitude, location.longitude)
            .await
    }

    fn current_location_for_fetch(&self) -> Result<&Location, ApiError> {
        self.location.as_ref().ok_or_else(|| {
            warn!("weather requested without a selected location");
            ApiError::InvalidCoordinates
        })
    }

    /// Load the viewer's rain-alert preferences.
    pub async fn alert_preferences(&self) -> Result<RainAlertPreferences, AlertError> {
        let viewer = self.host.viewer().await.ok_or_else(|| {
            warn!("alert preferences requested without a signed-in viewer");
            AlertError::LoadFailed
        })?;
        self.alerts.fetch_preferences(viewer.fid).await
    }

    /// Store the viewer's rain-alert preferences for the current location.
    pub async fn save_alert_preferences(
        &self,
        preferences: &RainAlertPreferences,
    ) -> Result<(), AlertError> {
        let viewer = self.host.viewer().await.ok_or_else(|| {
            warn!("alert preferences saved without a signed-in viewer");
            AlertError::SaveFailed
        })?;
        let location = self.location.as_ref().ok_or_else(|| {
            warn!("alert preferences saved without a selected location");
            AlertError::SaveFailed
        })?;
        self.alerts
            .save_preferences(&viewer, location, preferences)
            .await
    }

    /// Ask the backend for a test notification.
    pub async fn send_test_alert(&self) -> Result<(), AlertError> {
        let viewer = self.host.viewer().await.ok_or_else(|| {
            warn!("test alert requested without a signed-in viewer");
            AlertError::TestFailed
        })?;
        self.alerts.send_test(viewer.fid).await
    }
}
