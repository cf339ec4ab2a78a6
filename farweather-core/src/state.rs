//! Navigation and permission state machine.
//!
//! Pure transition logic, no IO: the coordinator feeds it events and reads
//! the resulting screen. Both axes are closed enums so every transition is
//! an exhaustive match.

/// Which screen is showing. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationState {
    /// Landing screen with the two ways to pick a location.
    Home,
    /// Profile-location resolution in progress or reporting its outcome.
    CurrentLocation,
    /// Typing a query and picking from results.
    SearchLocation,
    /// Forecast for the selected location.
    WeatherView,
}

/// Lifecycle of the profile-location resolution flow. Independent axis,
/// only meaningful while on the CurrentLocation screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    NotRequested,
    Pending,
    Granted,
    /// Signed in, but the profile has no location. Recoverable by editing
    /// the profile or searching manually.
    Denied,
    /// The lookup could not be completed. Recoverable by retrying.
    Error,
}

/// The two state axes plus their transition events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppState {
    nav: NavigationState,
    permission: PermissionState,
}

impl AppState {
    /// Initial state, decided once after the persistence load completes: a
    /// valid saved location goes straight to the forecast.
    pub fn at_startup(has_saved_location: bool) -> Self {
        Self {
            nav: if has_saved_location {
                NavigationState::WeatherView
            } else {
                NavigationState::Home
            },
            permission: PermissionState::NotRequested,
        }
    }

    pub fn navigation(&self) -> NavigationState {
        self.nav
    }

    pub fn permission(&self) -> PermissionState {
        self.permission
    }

    /// "Use my current location": show the resolution screen and mark the
    /// lookup as in flight.
    pub fn request_current_location(&mut self) {
        self.nav = NavigationState::CurrentLocation;
        self.permission = PermissionState::Pending;
    }

    /// "Search for a city".
    pub fn start_search(&mut self) {
        self.nav = NavigationState::SearchLocation;
    }

    /// Back to the landing screen, abandoning any in-flight resolution or
    /// search. The coordinator resets the search debouncer alongside this.
    pub fn go_home(&mut self) {
        self.nav = NavigationState::Home;
        self.permission = PermissionState::NotRequested;
    }

    /// A location was resolved, from either the profile lookup or a search
    /// selection: show the forecast unconditionally.
    pub fn location_resolved(&mut self) {
        self.nav = NavigationState::WeatherView;
        self.permission = PermissionState::Granted;
    }

    /// The profile lookup found no location on the profile.
    pub fn permission_denied(&mut self) {
        self.permission = PermissionState::Denied;
    }

    /// The profile lookup failed outright.
    pub fn permission_errored(&mut self) {
        self.permission = PermissionState::Error;
    }

    /// "Try again" on the resolution screen: back to square one, then the
    /// caller immediately re-requests.
    pub fn retry_current_location(&mut self) {
        self.permission = PermissionState::NotRequested;
        self.request_current_location();
    }

    /// "Clear location" from the forecast: back home, nothing selected.
    pub fn clear_location(&mut self) {
        self.nav = NavigationState::Home;
        self.permission = PermissionState::NotRequested;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_without_saved_location_lands_home() {
        let state = AppState::at_startup(false);
        assert_eq!(state.navigation(), NavigationState::Home);
        assert_eq!(state.permission(), PermissionState::NotRequested);
    }

    #[test]
    fn startup_with_saved_location_lands_on_forecast() {
        let state = AppState::at_startup(true);
        assert_eq!(state.navigation(), NavigationState::WeatherView);
    }

    #[test]
    fn requesting_location_moves_to_resolution_screen() {
        let mut state = AppState::at_startup(false);
        state.request_current_location();
        assert_eq!(state.navigation(), NavigationState::CurrentLocation);
        assert_eq!(state.permission(), PermissionState::Pending);
    }

    #[test]
    fn resolution_success_always_shows_forecast() {
        let mut state = AppState::at_startup(false);
        state.request_current_location();
        state.location_resolved();
        assert_eq!(state.navigation(), NavigationState::WeatherView);
        assert_eq!(state.permission(), PermissionState::Granted);

        // Selecting a search result behaves identically.
        let mut state = AppState::at_startup(false);
        state.start_search();
        state.location_resolved();
        assert_eq!(state.navigation(), NavigationState::WeatherView);
    }

    #[test]
    fn missing_profile_location_is_denied_not_error() {
        let mut state = AppState::at_startup(false);
        state.request_current_location();
        state.permission_denied();
        assert_eq!(state.navigation(), NavigationState::CurrentLocation);
        assert_eq!(state.permission(), PermissionState::Denied);
    }

    #[test]
    fn lookup_failure_is_error_and_retryable() {
        let mut state = AppState::at_startup(false);
        state.request_current_location();
        state.permission_errored();
        assert_eq!(state.permission(), PermissionState::Error);

        state.retry_current_location();
        assert_eq!(state.navigation(), NavigationState::CurrentLocation);
        assert_eq!(state.permission(), PermissionState::Pending);
    }

    #[test]
    fn going_home_abandons_in_flight_resolution() {
        let mut state = AppState::at_startup(false);
        state.request_current_location();
        state.go_home();
        assert_eq!(state.navigation(), NavigationState::Home);
        assert_eq!(state.permission(), PermissionState::NotRequested);

        let mut state = AppState::at_startup(false);
        state.start_search();
        state.go_home();
        assert_eq!(state.navigation(), NavigationState::Home);
    }

    #[test]
    fn clearing_location_leaves_forecast_for_home() {
        let mut state = AppState::at_startup(true);
        state.clear_location();
        assert_eq!(state.navigation(), NavigationState::Home);
        assert_eq!(state.permission(), PermissionState::NotRequested);
    }
}
