// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Config service and storage port for geomap tools.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::prefs::MapPrefs;

/// Store key under which [`MapPrefs`] are persisted.
pub const PREFS_KEY: &str = "map-prefs";

/// Storage port for raw config blobs (keyed by logical name).
pub trait ConfigStore {
    /// Load a raw config blob. Returns `NotFound` when missing.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Persist a raw config blob.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Error type for config operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Key not present in store.
    #[error("not found")]
    NotFound,
    /// I/O error while reading/writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization/deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Store could not be located or initialised.
    #[error("config store unavailable: {0}")]
    Unavailable(String),
}

/// Serializes config values as JSON and delegates storage to a `ConfigStore`.
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Create a new service using the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the inner store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S> ConfigService<S>
where
    S: ConfigStore,
{
    /// Load and deserialize `key`. Missing or empty blobs are `Ok(None)`.
    pub fn load<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: DeserializeOwned,
    {
        let bytes = match self.store.load_raw(key) {
            Ok(bytes) => bytes,
            Err(ConfigError::NotFound) => return Ok(None),
            Err(e) => return Err(e),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Serialize `value` as pretty JSON and persist it under `key`.
    pub fn save<T>(&self, key: &str, value: &T) -> Result<(), ConfigError>
    where
        T: Serialize,
    {
        let data = serde_json::to_vec_pretty(value)?;
        self.store.save_raw(key, &data)
    }

    /// Stored prefs, or defaults when none are stored.
    ///
    /// A corrupt blob is an error here; see [`Self::load_prefs_or_default`].
    pub fn load_prefs(&self) -> Result<MapPrefs, ConfigError> {
        Ok(self.load(PREFS_KEY)?.unwrap_or_default())
    }

    /// Stored prefs, falling back to defaults on any failure (logged).
    pub fn load_prefs_or_default(&self) -> MapPrefs {
        match self.load_prefs() {
            Ok(prefs) => prefs,
            Err(err) => {
                warn!(error = %err, key = PREFS_KEY, "unreadable prefs, using defaults");
                MapPrefs::default()
            }
        }
    }

    /// Persist prefs.
    pub fn save_prefs(&self, prefs: &MapPrefs) -> Result<(), ConfigError> {
        self.save(PREFS_KEY, prefs)
    }
}
