//! User-directory client for profile-location lookups.
//!
//! The embedding platform stores an optional location on each user profile.
//! Resolving it needs the viewer identity from the host plus a directory
//! service credential. The error kinds here are deliberately distinct: the
//! UI offers a different recovery path for each one.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::api::body_excerpt;
use crate::config::Config;
use crate::host::Viewer;
use crate::model::validate_coordinates;

/// Profile-location failures, one per recovery path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileLocationError {
    /// No signed-in viewer; the host context gave us nobody to look up.
    #[error("Unable to access your profile. Please make sure you are signed in.")]
    NotAuthenticated,

    /// The profile exists but carries no location. Recoverable by editing
    /// the profile or searching manually.
    #[error("Please set a location in your profile settings to use this feature.")]
    LocationNotSet,

    /// No directory credential is configured.
    #[error("Location service is temporarily unavailable. Please try again later.")]
    ServiceUnavailable,

    /// The lookup itself failed; retrying may help.
    #[error(
        "Failed to get the location from your profile. Please try again or search for your city manually."
    )]
    LookupFailed,
}

/// A location as stored on a user profile.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileLocation {
    pub latitude: f64,
    pub longitude: f64,
    /// Human-readable place name, when the profile has one.
    pub address: Option<String>,
}

/// HTTP client for the user-directory service.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl DirectoryClient {
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
            base_url: config.directory.base_url.clone(),
            api_key: config.directory.api_key.clone(),
        })
    }

    /// Look up the viewer's profile location.
    pub async fn profile_location(
        &self,
        viewer: Option<&Viewer>,
    ) -> Result<ProfileLocation, ProfileLocationError> {
        let viewer = viewer.ok_or(ProfileLocationError::NotAuthenticated)?;
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            warn!("directory lookup requested without a configured API key");
            ProfileLocationError::ServiceUnavailable
        })?;

        let url = format!("{}/user/by-username", self.base_url);
        debug!(username = %viewer.username, "looking up profile location");

        let response = self
            .http
            .get(&url)
            .query(&[("username", viewer.username.as_str())])
            .header("x-api-key", api_key)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "directory request failed");
                ProfileLocationError::LookupFailed
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, body = %body_excerpt(&body), "directory returned error status");
            return Err(ProfileLocationError::LookupFailed);
        }

        let parsed: UserEnvelope = response.json().await.map_err(|e| {
            warn!(error = %e, "failed to parse directory response");
            ProfileLocationError::LookupFailed
        })?;

        let record = parsed
            .user
            .profile
            .and_then(|p| p.location)
            .ok_or(ProfileLocationError::LocationNotSet)?;

        if !validate_coordinates(record.latitude, record.longitude) {
            warn!(
                latitude = record.latitude,
                longitude = record.longitude,
                "profile location has invalid coordinates"
            );
            return Err(ProfileLocationError::LookupFailed);
        }

        Ok(ProfileLocation {
            latitude: record.latitude,
            longitude: record.longitude,
            address: record.address.and_then(|a| a.city),
        })
    }
}

#[derive(Debug, Deserialize)]
struct UserEnvelope {
    user: DirectoryUser,
}

#[derive(Debug, Deserialize)]
struct DirectoryUser {
    #[serde(default)]
    profile: Option<DirectoryProfile>,
}

#[derive(Debug, Deserialize)]
struct DirectoryProfile {
    #[serde(default)]
    location: Option<LocationRecord>,
}

#[derive(Debug, Deserialize)]
struct LocationRecord {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    address: Option<AddressRecord>,
}

#[derive(Debug, Deserialize)]
struct AddressRecord {
    #[serde(default)]
    city: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with_key(api_key: Option<&str>) -> DirectoryClient {
        let mut config = Config::default();
        config.directory.base_url = "http://127.0.0.1:1".to_string();
        config.directory.api_key = api_key.map(str::to_string);
        DirectoryClient::new(&config).expect("client")
    }

    #[tokio::test]
    async fn missing_viewer_is_not_authenticated() {
        let client = client_with_key(Some("KEY"));
        let err = client.profile_location(None).await.unwrap_err();
        assert_eq!(err, ProfileLocationError::NotAuthenticated);
    }

    #[tokio::test]
    async fn missing_api_key_is_service_unavailable() {
        let client = client_with_key(None);
        let viewer = Viewer {
            fid: 194,
            username: "alice".to_string(),
        };

        // Fails before any network activity; the base URL is unreachable.
        let err = client.profile_location(Some(&viewer)).await.unwrap_err();
        assert_eq!(err, ProfileLocationError::ServiceUnavailable);
    }

    #[test]
    fn envelope_with_location_parses() {
        let json = r#"{"user":{"fid":194,"username":"alice","profile":{
            "location":{"latitude":48.8566,"longitude":2.3522,
                "address":{"city":"Paris","country":"France"}}}}}"#;
        let parsed: UserEnvelope = serde_json::from_str(json).expect("parse");
        let record = parsed.user.profile.and_then(|p| p.location).expect("location");
        assert_eq!(record.address.and_then(|a| a.city).as_deref(), Some("Paris"));
    }

    #[test]
    fn envelope_without_location_parses_to_none() {
        let json = r#"{"user":{"fid":194,"username":"alice","profile":{}}}"#;
        let parsed: UserEnvelope = serde_json::from_str(json).expect("parse");
        assert!(parsed.user.profile.and_then(|p| p.location).is_none());
    }

    #[test]
    fn error_kinds_are_distinct() {
        let kinds = [
            ProfileLocationError::NotAuthenticated,
            ProfileLocationError::LocationNotSet,
            ProfileLocationError::ServiceUnavailable,
            ProfileLocationError::LookupFailed,
        ];
        for (i, a) in kinds.iter().enumerate() {
            for (j, b) in kinds.iter().enumerate() {
                assert_eq!(i == j, a == b);
            }
        }
    }
}
