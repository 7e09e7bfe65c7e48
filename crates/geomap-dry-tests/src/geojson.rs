// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! GeoJSON feature fixtures.
//!
//! Coordinates are taken as `[lat, lng]` and written out in GeoJSON's
//! `[lng, lat]` order, so expected bounds read the same as the input.

use serde_json::{json, Value};

/// Axis-aligned polygon feature spanning `south_west`..`north_east`.
pub fn square(id: &str, south_west: [f64; 2], north_east: [f64; 2]) -> Value {
    let [lat0, lng0] = south_west;
    let [lat1, lng1] = north_east;
    json!({
        "type": "Feature",
        "id": id,
        "geometry": {
            "type": "Polygon",
            "coordinates": [[
                [lng0, lat0], [lng1, lat0], [lng1, lat1], [lng0, lat1], [lng0, lat0]
            ]]
        },
        "properties": {}
    })
}

/// Point feature at `lat`, `lng`.
pub fn point(id: &str, lat: f64, lng: f64) -> Value {
    json!({
        "type": "Feature",
        "id": id,
        "geometry": {"type": "Point", "coordinates": [lng, lat]},
        "properties": {}
    })
}

/// Feature collection of `features`.
pub fn collection(features: impl IntoIterator<Item = Value>) -> Value {
    json!({
        "type": "FeatureCollection",
        "features": features.into_iter().collect::<Vec<_>>()
    })
}
