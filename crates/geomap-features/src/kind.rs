// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Node kinds and classification of raw payload nodes.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::FeatureError;

/// Closed set of feature node kinds.
///
/// The serialized form is the wire type tag (`typeName`, or the GeoJSON
/// `type` for shapes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Top-level result of a query.
    #[serde(rename = "GeoQueryFeatures")]
    QueryFeatures,
    /// Result of a manually supplied geometry.
    #[serde(rename = "GeoFeatures")]
    GeometryFeatures,
    /// Delegate: field name → terms.
    #[serde(rename = "GeoByField")]
    ByField,
    /// A field's matched terms.
    #[serde(rename = "GeoTerms")]
    Terms,
    /// Delegate: tier name → geometry.
    #[serde(rename = "GeoByTier")]
    ByTier,
    /// Delegate: ordered function results.
    #[serde(rename = "GeoFunctionArray")]
    Functions,
    /// A wrapped GeoJSON encoding.
    #[serde(rename = "Geo")]
    Geometry,
    /// One function's evaluated geometry.
    #[serde(rename = "GeoFunction")]
    Function,
    /// A single GeoJSON feature.
    #[serde(rename = "Feature")]
    Shape,
    /// A GeoJSON feature collection.
    #[serde(rename = "FeatureCollection")]
    ShapeCollection,
}

impl NodeKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::QueryFeatures,
        Self::GeometryFeatures,
        Self::ByField,
        Self::Terms,
        Self::ByTier,
        Self::Functions,
        Self::Geometry,
        Self::Function,
        Self::Shape,
        Self::ShapeCollection,
    ];

    /// Wire type tag.
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::QueryFeatures => "GeoQueryFeatures",
            Self::GeometryFeatures => "GeoFeatures",
            Self::ByField => "GeoByField",
            Self::Terms => "GeoTerms",
            Self::ByTier => "GeoByTier",
            Self::Functions => "GeoFunctionArray",
            Self::Geometry => "Geo",
            Self::Function => "GeoFunction",
            Self::Shape => "Feature",
            Self::ShapeCollection => "FeatureCollection",
        }
    }

    /// Synthetic wrapper kinds that only exist in the traversal view.
    pub const fn is_delegate(self) -> bool {
        matches!(self, Self::ByField | Self::ByTier | Self::Functions)
    }

    /// Kinds that may stand at the root of a session.
    pub const fn is_root(self) -> bool {
        matches!(self, Self::QueryFeatures | Self::GeometryFeatures)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl FromStr for NodeKind {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.type_name() == s)
            .ok_or_else(|| FeatureError::UnknownNodeType(s.to_owned()))
    }
}

/// Declared discriminator of a raw node: `typeName` first, then GeoJSON `type`.
pub fn type_name(value: &Value) -> Option<&str> {
    let object = value.as_object()?;
    object
        .get("typeName")
        .and_then(Value::as_str)
        .or_else(|| object.get("type").and_then(Value::as_str))
}

/// Classify a raw payload node.
///
/// Unknown tags are rejected (and logged) rather than treated as leaves.
pub fn classify(value: &Value) -> Result<NodeKind, FeatureError> {
    let Some(name) = type_name(value) else {
        warn!("feature node without a type discriminator");
        return Err(FeatureError::MissingNodeType);
    };
    name.parse()
        .inspect_err(|_| warn!(type_name = name, "unrecognized feature node type"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use serde_json::json;

    #[test]
    fn explicit_tag_wins_over_geojson_type() {
        let node = json!({"typeName": "GeoTerms", "type": "Feature"});
        assert_eq!(classify(&node).unwrap(), NodeKind::Terms);
    }

    #[test]
    fn geojson_type_is_the_fallback() {
        assert_eq!(
            classify(&json!({"type": "FeatureCollection", "features": []})).unwrap(),
            NodeKind::ShapeCollection
        );
    }

    #[test]
    fn missing_and_unknown_are_distinct_errors() {
        assert!(matches!(
            classify(&json!({"geoJson": {}})),
            Err(FeatureError::MissingNodeType)
        ));
        assert!(matches!(
            classify(&json!([1, 2])),
            Err(FeatureError::MissingNodeType)
        ));
        match classify(&json!({"typeName": "GeoSomething"})) {
            Err(FeatureError::UnknownNodeType(name)) => assert_eq!(name, "GeoSomething"),
            other => unreachable!("unexpected classification {other:?}"),
        }
    }

    #[test]
    fn tags_round_trip_through_serde() {
        for kind in NodeKind::ALL {
            let encoded = serde_json::to_value(kind).unwrap();
            assert_eq!(encoded, Value::String(kind.type_name().to_owned()));
            assert_eq!(kind.type_name().parse::<NodeKind>().unwrap(), kind);
        }
    }

    #[test]
    fn delegate_and_root_kinds() {
        assert!(NodeKind::ByTier.is_delegate());
        assert!(!NodeKind::Terms.is_delegate());
        assert!(NodeKind::GeometryFeatures.is_root());
        assert!(!NodeKind::Geometry.is_root());
    }
}
