// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Typed feature payloads.
//!
//! These mirror the JSON returned by the map service's query endpoints.
//! `label` and `typeName` are usually absent on the wire and filled in by
//! [`crate::decorate`]. Mappings are `IndexMap`s kept in payload order,
//! except that integer-like keys (tier numbers) come first in numeric order.

use core::cmp::Ordering as KeyOrder;
use core::slice;
use core::sync::atomic::{AtomicU64, Ordering};

use geojson::feature::Id;
use geojson::{Bbox, Feature, FeatureCollection, GeoJson, Geometry, JsonObject};
use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::kind::{classify, NodeKind};
use crate::FeatureError;

/// Field name → terms.
pub type GeoByField = IndexMap<String, GeoTerms>;
/// Tier name → geometry.
pub type GeoByTier = IndexMap<String, Geo>;

/// Array-index keys (`"0"`, `"2"`, `"10"`) sort numerically ahead of the
/// rest. Other keys keep their relative order.
fn key_rank(key: &str) -> Option<u32> {
    let digits = key.bytes().all(|b| b.is_ascii_digit());
    if !digits || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    key.parse().ok()
}

fn compare_keys(a: &str, b: &str) -> KeyOrder {
    match (key_rank(a), key_rank(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => KeyOrder::Less,
        (None, Some(_)) => KeyOrder::Greater,
        (None, None) => KeyOrder::Equal,
    }
}

fn ordered_map<'de, D, V>(deserializer: D) -> Result<Option<IndexMap<String, V>>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    let mut map = Option::<IndexMap<String, V>>::deserialize(deserializer)?;
    if let Some(map) = map.as_mut() {
        map.sort_by(|a, _, b, _| compare_keys(a, b));
    }
    Ok(map)
}

static NEXT_SHAPE_KEY: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`Shape`].
///
/// Keys the layer side table, so the payload never carries layer state.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShapeKey(u64);

impl ShapeKey {
    fn fresh() -> Self {
        Self(NEXT_SHAPE_KEY.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw key value.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// A single GeoJSON feature: the leaf of every feature tree.
#[derive(Debug)]
pub struct Shape {
    key: ShapeKey,
    feature: Feature,
}

impl Shape {
    /// Wrap a feature, allocating a fresh key.
    pub fn new(feature: Feature) -> Self {
        Self {
            key: ShapeKey::fresh(),
            feature,
        }
    }

    /// Identity used by the layer table.
    pub fn key(&self) -> ShapeKey {
        self.key
    }

    /// The underlying GeoJSON feature.
    pub fn feature(&self) -> &Feature {
        &self.feature
    }

    /// Geometry to draw, if any.
    pub fn geometry(&self) -> Option<&Geometry> {
        self.feature.geometry.as_ref()
    }

    /// The feature's GeoJSON `id` rendered as a string.
    pub fn id_string(&self) -> Option<String> {
        self.feature.id.as_ref().map(|id| match id {
            Id::String(s) => s.clone(),
            Id::Number(n) => n.to_string(),
        })
    }

    /// `properties.label`, when it is a string.
    pub fn label(&self) -> Option<&str> {
        self.property("label").and_then(Value::as_str)
    }

    /// A property value by name.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.feature.properties.as_ref()?.get(name)
    }

    /// Set `properties.label`, creating the properties object when absent.
    pub fn set_label(&mut self, label: String) {
        self.feature
            .properties
            .get_or_insert_with(JsonObject::new)
            .insert("label".to_owned(), Value::String(label));
    }
}

impl Serialize for Shape {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.feature.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Shape {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Feature::deserialize(deserializer).map(Self::new)
    }
}

/// An ordered sequence of shapes (a GeoJSON `FeatureCollection`).
#[derive(Debug, Default)]
pub struct ShapeCollection {
    /// Member shapes, in payload order.
    pub shapes: Vec<Shape>,
    bbox: Option<Bbox>,
    foreign_members: Option<JsonObject>,
}

impl ShapeCollection {
    fn to_geojson(&self) -> FeatureCollection {
        FeatureCollection {
            bbox: self.bbox.clone(),
            features: self.shapes.iter().map(|s| s.feature.clone()).collect(),
            foreign_members: self.foreign_members.clone(),
        }
    }
}

impl From<FeatureCollection> for ShapeCollection {
    fn from(fc: FeatureCollection) -> Self {
        Self {
            shapes: fc.features.into_iter().map(Shape::new).collect(),
            bbox: fc.bbox,
            foreign_members: fc.foreign_members,
        }
    }
}

/// A GeoJSON encoding limited to `Feature` and `FeatureCollection`.
#[derive(Debug)]
pub enum GeometryEncoding {
    /// A single shape.
    Feature(Shape),
    /// Several shapes.
    FeatureCollection(ShapeCollection),
}

impl GeometryEncoding {
    /// Contained shapes, in order.
    pub fn shapes(&self) -> &[Shape] {
        match self {
            Self::Feature(shape) => slice::from_ref(shape),
            Self::FeatureCollection(collection) => &collection.shapes,
        }
    }

    /// Contained shapes, mutably.
    pub fn shapes_mut(&mut self) -> &mut [Shape] {
        match self {
            Self::Feature(shape) => slice::from_mut(shape),
            Self::FeatureCollection(collection) => &mut collection.shapes,
        }
    }

    /// `Shape` or `ShapeCollection`.
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Feature(_) => NodeKind::Shape,
            Self::FeatureCollection(_) => NodeKind::ShapeCollection,
        }
    }
}

impl TryFrom<GeoJson> for GeometryEncoding {
    type Error = FeatureError;

    fn try_from(value: GeoJson) -> Result<Self, Self::Error> {
        match value {
            GeoJson::Feature(feature) => Ok(Self::Feature(Shape::new(feature))),
            GeoJson::FeatureCollection(fc) => Ok(Self::FeatureCollection(fc.into())),
            GeoJson::Geometry(geometry) => Err(FeatureError::UnsupportedGeometry(
                geometry_type(&geometry.value).to_owned(),
            )),
        }
    }
}

fn geometry_type(value: &geojson::Value) -> &'static str {
    use geojson::Value as V;
    match value {
        V::Point(_) => "Point",
        V::MultiPoint(_) => "MultiPoint",
        V::LineString(_) => "LineString",
        V::MultiLineString(_) => "MultiLineString",
        V::Polygon(_) => "Polygon",
        V::MultiPolygon(_) => "MultiPolygon",
        V::GeometryCollection(_) => "GeometryCollection",
    }
}

impl Serialize for GeometryEncoding {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Feature(shape) => shape.serialize(serializer),
            Self::FeatureCollection(collection) => collection.to_geojson().serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for GeometryEncoding {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let geojson = GeoJson::deserialize(deserializer)?;
        Self::try_from(geojson).map_err(D::Error::custom)
    }
}

/// A wrapped GeoJSON encoding, optionally with its WKT source.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Geo {
    /// Display label (tier name, `Geometry`, …).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Declared type tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<NodeKind>,
    /// Well-known-text source of the geometry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wkt: Option<String>,
    /// The shapes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_json: Option<GeometryEncoding>,
}

/// A field's matched terms: geometry plus optional per-tier breakdown.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoTerms {
    /// Display label (the field name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Declared type tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<NodeKind>,
    /// Union geometry of the terms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo: Option<Geo>,
    /// Geometry per index tier.
    #[serde(
        default,
        deserialize_with = "ordered_map",
        skip_serializing_if = "Option::is_none"
    )]
    pub geo_by_tier: Option<GeoByTier>,
}

/// One geo function's evaluated geometry.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoFunction {
    /// Display label (the function expression).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Declared type tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<NodeKind>,
    /// The function expression as written in the query.
    #[serde(default)]
    pub function: String,
    /// Fields the function applies to.
    #[serde(default)]
    pub fields: Vec<String>,
    /// The function's geometry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_json: Option<GeometryEncoding>,
}

/// Top-level result of a query.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoQueryFeatures {
    /// Session id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display label (initially the session id).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Declared type tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<NodeKind>,
    /// Query plan the result came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Query id the result was looked up by.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_id: Option<String>,
    /// Terms per field.
    #[serde(
        default,
        deserialize_with = "ordered_map",
        skip_serializing_if = "Option::is_none"
    )]
    pub geo_by_field: Option<GeoByField>,
    /// Function results, in query order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub functions: Option<Vec<GeoFunction>>,
}

/// Result of a manually supplied geometry.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoFeatures {
    /// Session id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display label (initially the session id).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Declared type tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<NodeKind>,
    /// The submitted geometry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geo>,
    /// Index ranges generated for the geometry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_ranges: Option<GeoTerms>,
}

/// The root of one session's tree.
// Roots are moved once into the session map and then borrowed.
#[allow(clippy::large_enum_variant)]
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum FeatureRoot {
    /// A query result.
    Query(GeoQueryFeatures),
    /// A manual geometry result.
    Geometry(GeoFeatures),
}

impl FeatureRoot {
    /// Classify and decode a raw root payload.
    pub fn from_value(value: Value) -> Result<Self, FeatureError> {
        let kind = classify(&value)?;
        Self::from_value_as(kind, value)
    }

    /// Decode a raw payload as `kind`, ignoring any tag it carries.
    ///
    /// Service responses arrive untagged; the endpoint decides the kind.
    pub fn from_value_as(kind: NodeKind, value: Value) -> Result<Self, FeatureError> {
        let payload = |source| FeatureError::Payload { kind, source };
        let mut root = match kind {
            NodeKind::QueryFeatures => Self::Query(serde_json::from_value(value).map_err(payload)?),
            NodeKind::GeometryFeatures => {
                Self::Geometry(serde_json::from_value(value).map_err(payload)?)
            }
            other => return Err(FeatureError::NotARoot(other)),
        };
        root.set_type_name();
        Ok(root)
    }

    /// Root kind.
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Query(_) => NodeKind::QueryFeatures,
            Self::Geometry(_) => NodeKind::GeometryFeatures,
        }
    }

    /// Session id, once assigned.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Query(q) => q.id.as_deref(),
            Self::Geometry(g) => g.id.as_deref(),
        }
    }

    /// Display label.
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Query(q) => q.label.as_deref(),
            Self::Geometry(g) => g.label.as_deref(),
        }
    }

    /// Set the display label only.
    pub fn set_label(&mut self, label: &str) {
        let slot = match self {
            Self::Query(q) => &mut q.label,
            Self::Geometry(g) => &mut g.label,
        };
        *slot = Some(label.to_owned());
    }

    /// Assign the session id, which is also the initial label.
    pub fn assign_id(&mut self, id: &str) {
        match self {
            Self::Query(q) => q.id = Some(id.to_owned()),
            Self::Geometry(g) => g.id = Some(id.to_owned()),
        }
        self.set_label(id);
    }

    fn set_type_name(&mut self) {
        let kind = self.kind();
        match self {
            Self::Query(q) => q.type_name = Some(kind),
            Self::Geometry(g) => g.type_name = Some(kind),
        }
    }
}

impl From<GeoQueryFeatures> for FeatureRoot {
    fn from(mut value: GeoQueryFeatures) -> Self {
        value.type_name = Some(NodeKind::QueryFeatures);
        Self::Query(value)
    }
}

impl From<GeoFeatures> for FeatureRoot {
    fn from(mut value: GeoFeatures) -> Self {
        value.type_name = Some(NodeKind::GeometryFeatures);
        Self::Geometry(value)
    }
}
