//! Core library for the `farweather` mini-app.
//!
//! This crate defines:
//! - Configuration handling and the location persistence store
//! - HTTP clients for the forecast, geocoding, user-directory, and
//!   rain-alert services
//! - The cached/deduplicated query layer with debounced search
//! - The navigation/permission state machine and the app coordinator
//!
//! It is used by `farweather-app`, but can also be reused by other
//! front-ends or services.

pub mod api;
pub mod app;
pub mod conditions;
pub mod config;
pub mod format;
pub mod host;
pub mod model;
pub mod queries;
pub mod retry;
pub mod search;
pub mod state;
pub mod store;

pub use api::alerts::{AlertClient, AlertError, RainAlertPreferences, RainIntensity};
pub use api::directory::{DirectoryClient, ProfileLocationError};
pub use api::open_meteo::{ApiError, OpenMeteoClient};
pub use app::WeatherApp;
pub use config::Config;
pub use host::{HostContext, StaticHost, Viewer};
pub use model::{Location, WeatherData, validate_coordinates};
pub use queries::WeatherQueries;
pub use search::{SearchDebouncer, SearchState};
pub use state::{NavigationState, PermissionState};
pub use store::LocationStore;
