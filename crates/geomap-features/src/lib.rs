// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Feature tree walker for geo query results.
//!
//! A query result is a heterogeneous tree: per-field terms, per-tier
//! geometries and function results, all bottoming out in GeoJSON features.
//! This crate decodes such payloads into a closed set of typed nodes
//! ([`model`]), walks them through one borrowed view ([`FeatureRef`]) and
//! runs the tree-wide operations over it:
//!
//! - [`decorate`]: label and type assignment after loading.
//! - [`LayerManager`]: lazy layer creation, attach/detach, visibility,
//!   visible bounds and colour, keyed by shape in a side table.
//! - [`FeatureStore`]: the session map driving all of the above against a
//!   [`MapSurface`](geomap_surface_port::MapSurface).
//!
//! Unknown node types are rejected at ingestion ([`classify`],
//! [`FeatureRoot::from_value`]); once a tree is typed, traversal cannot fail.

pub mod decorate;
mod error;
pub mod kind;
pub mod layers;
pub mod model;
pub mod node;
pub mod store;

pub use decorate::decorate;
pub use error::FeatureError;
pub use kind::{classify, NodeKind};
pub use layers::LayerManager;
pub use model::{
    FeatureRoot, Geo, GeoByField, GeoByTier, GeoFeatures, GeoFunction, GeoQueryFeatures,
    GeoTerms, GeometryEncoding, Shape, ShapeCollection, ShapeKey,
};
pub use node::{DepthFirst, FeatureRef, NodePath};
pub use store::{FeatureStore, QueryOrigin, SessionKind};
