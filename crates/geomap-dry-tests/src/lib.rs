// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for geomap crates.
#![forbid(unsafe_code)]
//!
//! # Modules
//!
//! - [`config`] - In-memory config store fake for testing without filesystem
//! - [`geojson`] - GeoJSON feature fixtures
//! - [`payloads`] - Query and manual geometry payload builders

pub mod config;
pub mod geojson;
pub mod payloads;

pub use config::InMemoryConfigStore;
pub use geojson::{collection, point, square};
pub use payloads::{two_field_query, GeometryBuilder, QueryBuilder};
