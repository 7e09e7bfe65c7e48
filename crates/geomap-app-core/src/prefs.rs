// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Map viewer preferences (layer style + session naming).

use geomap_surface_port::LayerStyle;
use serde::{Deserialize, Serialize};

/// Saved preferences for a map viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct MapPrefs {
    /// Style given to every newly created layer.
    pub layer_style: LayerStyle,
    /// Prefixes for generated session ids.
    pub naming: SessionNaming,
}

/// Prefixes for generated session ids (`"<prefix><n>"`, n from 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionNaming {
    /// Sessions loaded from a query plan.
    pub query: String,
    /// Sessions loaded by looking up an existing query id.
    pub lookup: String,
    /// Sessions loaded from a manually supplied geometry.
    pub geometry: String,
}

impl Default for SessionNaming {
    fn default() -> Self {
        Self {
            query: "Query ".to_owned(),
            lookup: "Query Lookup ".to_owned(),
            geometry: "Geometry ".to_owned(),
        }
    }
}
