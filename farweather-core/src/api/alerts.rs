//! Rain-alert backend client.
//!
//! The backend watches the forecast for subscribed locations and messages
//! users before rain; this client only manages the subscription preferences
//! and the test-notification endpoint. Wire field names are camelCase to
//! match the backend.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::api::body_excerpt;
use crate::config::Config;
use crate::host::Viewer;
use crate::model::Location;

/// Rain-alert backend failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlertError {
    #[error("Failed to load alert settings. Please try again.")]
    LoadFailed,

    #[error("Failed to save preferences. Please try again.")]
    SaveFailed,

    #[error("Failed to send the test notification. Please try again.")]
    TestFailed,
}

/// A user's rain-alert subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RainAlertPreferences {
    pub enabled: bool,
    pub preferences: AlertRules,
}

/// Tuning knobs for when an alert is worth sending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRules {
    /// Minutes of warning before the rain starts.
    pub advance_time: u32,
    pub minimum_intensity: RainIntensity,
    pub time_window: TimeWindow,
    pub max_alerts_per_day: u8,
}

/// Hours of the day during which alerts may be sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    pub start_hour: u8,
    pub end_hour: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RainIntensity {
    Light,
    Moderate,
    Heavy,
}

impl RainIntensity {
    pub const fn description(self) -> &'static str {
        match self {
            Self::Light => "Light rain (< 2.5 mm/hr)",
            Self::Moderate => "Moderate rain (2.5-7.5 mm/hr)",
            Self::Heavy => "Heavy rain (> 7.5 mm/hr)",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Heavy => "heavy",
        }
    }
}

impl Default for RainAlertPreferences {
    fn default() -> Self {
        Self {
            enabled: false,
            preferences: AlertRules {
                advance_time: 60,
                minimum_intensity: RainIntensity::Light,
                time_window: TimeWindow {
                    start_hour: 6,
                    end_hour: 22,
                },
                max_alerts_per_day: 3,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PreferencesEnvelope {
    rain_alerts: RainAlertPreferences,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SavePayload<'a> {
    fid: u64,
    username: &'a str,
    location: &'a Location,
    rain_alerts: &'a RainAlertPreferences,
}

/// HTTP client for the rain-alert backend.
#[derive(Debug, Clone)]
pub struct AlertClient {
    http: Client,
    base_url: String,
}

impl AlertClient {
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
            base_url: config.alerts.base_url.clone(),
        })
    }

    /// Load the stored preferences for a user; a user the backend has never
    /// seen gets the defaults.
    pub async fn fetch_preferences(&self, fid: u64) -> Result<RainAlertPreferences, AlertError> {
        let url = format!("{}/api/alerts/preferences/{fid}", self.base_url);
        debug!(fid, "loading alert preferences");

        let response = self.http.get(&url).send().await.map_err(|e| {
            warn!(error = %e, "alert preferences request failed");
            AlertError::LoadFailed
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(RainAlertPreferences::default());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, body = %body_excerpt(&body), "alert preferences returned error status");
            return Err(AlertError::LoadFailed);
        }

        let envelope: PreferencesEnvelope = response.json().await.map_err(|e| {
            warn!(error = %e, "failed to parse alert preferences");
            AlertError::LoadFailed
        })?;

        Ok(envelope.rain_alerts)
    }

    /// Store the preferences for a user and location.
    pub async fn save_preferences(
        &self,
        viewer: &Viewer,
        location: &Location,
        preferences: &RainAlertPreferences,
    ) -> Result<(), AlertError> {
        let url = format!("{}/api/alerts/preferences", self.base_url);
        debug!(fid = viewer.fid, "saving alert preferences");

        let payload = SavePayload {
            fid: viewer.fid,
            username: &viewer.username,
            location,
            rain_alerts: preferences,
        };

        let response = self
            .http
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "alert preferences save failed");
                AlertError::SaveFailed
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, body = %body_excerpt(&body), "alert preferences save returned error status");
            return Err(AlertError::SaveFailed);
        }

        Ok(())
    }

    /// Ask the backend to send a test notification right away.
    pub async fn send_test(&self, fid: u64) -> Result<(), AlertError> {
        let url = format!("{}/api/alerts/test/{fid}", self.base_url);
        debug!(fid, "sending test alert");

        let response = self.http.post(&url).send().await.map_err(|e| {
            warn!(error = %e, "test alert request failed");
            AlertError::TestFailed
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, body = %body_excerpt(&body), "test alert returned error status");
            return Err(AlertError::TestFailed);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_backend_expectations() {
        let prefs = RainAlertPreferences::default();
        assert!(!prefs.enabled);
        assert_eq!(prefs.preferences.advance_time, 60);
        assert_eq!(prefs.preferences.minimum_intensity, RainIntensity::Light);
        assert_eq!(prefs.preferences.time_window.start_hour, 6);
        assert_eq!(prefs.preferences.time_window.end_hour, 22);
        assert_eq!(prefs.preferences.max_alerts_per_day, 3);
    }

    #[test]
    fn wire_shape_is_camel_case() {
        let prefs = RainAlertPreferences::default();
        let json = serde_json::to_value(&prefs).expect("serialize");

        assert_eq!(json["enabled"], false);
        assert_eq!(json["preferences"]["advanceTime"], 60);
        assert_eq!(json["preferences"]["minimumIntensity"], "light");
        assert_eq!(json["preferences"]["timeWindow"]["startHour"], 6);
        assert_eq!(json["preferences"]["maxAlertsPerDay"], 3);
    }

    #[test]
    fn save_payload_carries_identity_and_location() {
        let viewer = Viewer {
            fid: 194,
            username: "alice".to_string(),
        };
        let location = Location::new("Paris", 48.8566, 2.3522);
        let prefs = RainAlertPreferences::default();
        let payload = SavePayload {
            fid: viewer.fid,
            username: &viewer.username,
            location: &location,
            rain_alerts: &prefs,
        };

        let json = serde_json::to_value(&payload).expect("serialize");
        assert_eq!(json["fid"], 194);
        assert_eq!(json["username"], "alice");
        assert_eq!(json["location"]["name"], "Paris");
        assert_eq!(json["rainAlerts"]["enabled"], false);
    }

    #[test]
    fn preferences_envelope_parses() {
        let json = r#"{"rainAlerts":{"enabled":true,"preferences":{
            "advanceTime":120,"minimumIntensity":"moderate",
            "timeWindow":{"startHour":8,"endHour":20},"maxAlertsPerDay":5}}}"#;
        let envelope: PreferencesEnvelope = serde_json::from_str(json).expect("parse");

        assert!(envelope.rain_alerts.enabled);
        assert_eq!(envelope.rain_alerts.preferences.advance_time, 120);
        assert_eq!(
            envelope.rain_alerts.preferences.minimum_intensity,
            RainIntensity::Moderate
        );
    }

    #[test]
    fn intensity_descriptions() {
        assert!(RainIntensity::Light.description().contains("< 2.5"));
        assert!(RainIntensity::Moderate.description().contains("2.5-7.5"));
        assert!(RainIntensity::Heavy.description().contains("> 7.5"));
    }
}
