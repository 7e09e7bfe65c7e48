// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared application services for geomap tools (config, prefs).
//! Keeps CLI/UI adapters thin and framework-agnostic.

pub mod config;
pub mod prefs;

pub use config::{ConfigError, ConfigService, ConfigStore, PREFS_KEY};
pub use prefs::{MapPrefs, SessionNaming};
