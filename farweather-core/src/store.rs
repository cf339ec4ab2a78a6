//! Durable storage for the selected location.
//!
//! One JSON record in a fixed file under the platform data directory. Reads
//! happen once at startup; writes follow every location change. Storage IO
//! failures are logged and swallowed: the in-memory location always wins,
//! and the app keeps working without persistence.

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, warn};

use crate::config::Config;
use crate::model::Location;

#[derive(Debug, Clone)]
pub struct LocationStore {
    path: PathBuf,
}

impl LocationStore {
    /// Store backed by the platform data directory.
    pub fn open() -> Result<Self> {
        Ok(Self {
            path: Config::location_file_path()?,
        })
    }

    /// Store backed by an explicit file, for tests.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Read the persisted location, if a usable one exists.
    ///
    /// Missing file, unreadable contents, and out-of-range coordinates all
    /// load as `None`; returning at all is the "load complete" signal
    /// callers sequence the initial navigation decision on.
    pub fn load(&self) -> Option<Location> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read saved location");
                return None;
            }
        };

        let location: Location = match serde_json::from_str(&contents) {
            Ok(location) => location,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "saved location is corrupt");
                return None;
            }
        };

        if !location.has_valid_coordinates() {
            warn!(
                latitude = location.latitude,
                longitude = location.longitude,
                "saved location has invalid coordinates"
            );
            return None;
        }

        debug!(name = %location.name, "loaded saved location");
        Some(location)
    }

    /// Persist the location, or clear the record when `None`.
    pub fn set(&self, location: Option<&Location>) {
        match location {
            Some(location) => {
                let write = || -> Result<()> {
                    if let Some(parent) = self.path.parent() {
                        fs::create_dir_all(parent)?;
                    }
                    let json = serde_json::to_string(location)?;
                    fs::write(&self.path, json)?;
                    Ok(())
                };
                if let Err(e) = write() {
                    warn!(path = %self.path.display(), error = %e, "failed to save location");
                }
            }
            None => {
                if let Err(e) = fs::remove_file(&self.path) {
                    if e.kind() != std::io::ErrorKind::NotFound {
                        warn!(path = %self.path.display(), error = %e, "failed to clear saved location");
                    }
                }
            }
        }
    }
}
