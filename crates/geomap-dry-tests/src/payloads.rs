// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Query and manual geometry payload builders.
//!
//! Builders produce the untagged JSON the query endpoints return. Use
//! [`QueryBuilder::value`] for raw-JSON paths, [`QueryBuilder::payload`] for
//! the typed payload, or [`QueryBuilder::root`] for a loaded root. Fields
//! and tiers are emitted in the order they were first added.

use geomap_features::{FeatureError, FeatureRoot, GeoFeatures, GeoQueryFeatures, NodeKind};
use indexmap::IndexMap;
use serde_json::{json, Map, Value};

use crate::geojson::square;

#[derive(Default)]
struct TermsSpec {
    geo: Option<Value>,
    tiers: IndexMap<String, Value>,
}

impl TermsSpec {
    fn to_value(&self) -> Value {
        let mut out = Map::new();
        if let Some(geo) = &self.geo {
            out.insert("geo".to_owned(), json!({"geoJson": geo}));
        }
        if !self.tiers.is_empty() {
            let tiers: Map<String, Value> = self
                .tiers
                .iter()
                .map(|(tier, geo)| (tier.clone(), json!({"geoJson": geo})))
                .collect();
            out.insert("geoByTier".to_owned(), Value::Object(tiers));
        }
        Value::Object(out)
    }
}

/// Builder for query result payloads.
///
/// # Example
///
/// ```
/// use geomap_dry_tests::{square, QueryBuilder};
///
/// let root = QueryBuilder::new()
///     .field("GEO", square("a", [0.0, 0.0], [1.0, 1.0]))
///     .function("geo:intersects(GEO, 'x')", &["GEO"], square("f", [0.0, 0.0], [2.0, 2.0]))
///     .root()
///     .unwrap();
///
/// assert_eq!(root.view().shapes().count(), 2);
/// ```
#[derive(Default)]
pub struct QueryBuilder {
    fields: IndexMap<String, TermsSpec>,
    functions: Vec<Value>,
    query: Option<String>,
}

impl QueryBuilder {
    /// Create an empty query payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Give `field` the union geometry `geo_json`.
    pub fn field(mut self, field: &str, geo_json: Value) -> Self {
        self.fields.entry(field.to_owned()).or_default().geo = Some(geo_json);
        self
    }

    /// Add a tier breakdown entry under `field`.
    pub fn tier(mut self, field: &str, tier: &str, geo_json: Value) -> Self {
        self.fields
            .entry(field.to_owned())
            .or_default()
            .tiers
            .insert(tier.to_owned(), geo_json);
        self
    }

    /// Append a function result.
    pub fn function(mut self, expression: &str, fields: &[&str], geo_json: Value) -> Self {
        self.functions.push(json!({
            "function": expression,
            "fields": fields,
            "geoJson": geo_json
        }));
        self
    }

    /// Set the query plan text carried by the payload.
    pub fn query(mut self, query: &str) -> Self {
        self.query = Some(query.to_owned());
        self
    }

    /// The raw JSON payload.
    pub fn value(&self) -> Value {
        let mut out = Map::new();
        if let Some(query) = &self.query {
            out.insert("query".to_owned(), Value::String(query.clone()));
        }
        if !self.fields.is_empty() {
            let fields: Map<String, Value> = self
                .fields
                .iter()
                .map(|(field, terms)| (field.clone(), terms.to_value()))
                .collect();
            out.insert("geoByField".to_owned(), Value::Object(fields));
        }
        if !self.functions.is_empty() {
            out.insert("functions".to_owned(), Value::Array(self.functions.clone()));
        }
        Value::Object(out)
    }

    /// The payload as JSON text.
    pub fn to_json(&self) -> String {
        self.value().to_string()
    }

    /// The typed payload.
    pub fn payload(&self) -> Result<GeoQueryFeatures, serde_json::Error> {
        serde_json::from_value(self.value())
    }

    /// The payload decoded as an undecorated session root.
    pub fn root(&self) -> Result<FeatureRoot, FeatureError> {
        FeatureRoot::from_value_as(NodeKind::QueryFeatures, self.value())
    }
}

/// Builder for manual geometry payloads.
#[derive(Default)]
pub struct GeometryBuilder {
    geometry: Option<Value>,
    ranges: Option<TermsSpec>,
}

impl GeometryBuilder {
    /// Create an empty manual geometry payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the submitted geometry.
    pub fn geometry(mut self, geo_json: Value) -> Self {
        self.geometry = Some(geo_json);
        self
    }

    /// Set the union geometry of the generated query ranges.
    pub fn ranges(mut self, geo_json: Value) -> Self {
        self.ranges.get_or_insert_with(TermsSpec::default).geo = Some(geo_json);
        self
    }

    /// Add a query range tier.
    pub fn range_tier(mut self, tier: &str, geo_json: Value) -> Self {
        self.ranges
            .get_or_insert_with(TermsSpec::default)
            .tiers
            .insert(tier.to_owned(), geo_json);
        self
    }

    /// The raw JSON payload.
    pub fn value(&self) -> Value {
        let mut out = Map::new();
        if let Some(geometry) = &self.geometry {
            out.insert("geometry".to_owned(), json!({"geoJson": geometry}));
        }
        if let Some(ranges) = &self.ranges {
            out.insert("queryRanges".to_owned(), ranges.to_value());
        }
        Value::Object(out)
    }

    /// The payload as JSON text.
    pub fn to_json(&self) -> String {
        self.value().to_string()
    }

    /// The typed payload.
    pub fn payload(&self) -> Result<GeoFeatures, serde_json::Error> {
        serde_json::from_value(self.value())
    }

    /// The payload decoded as an undecorated session root.
    pub fn root(&self) -> Result<FeatureRoot, FeatureError> {
        FeatureRoot::from_value_as(NodeKind::GeometryFeatures, self.value())
    }
}

/// `FIELD1` covering `[[0,0],[1,1]]` and `FIELD2` covering `[[5,5],[6,6]]`,
/// one feature each.
pub fn two_field_query() -> QueryBuilder {
    QueryBuilder::new()
        .field("FIELD1", square("a", [0.0, 0.0], [1.0, 1.0]))
        .field("FIELD2", square("b", [5.0, 5.0], [6.0, 6.0]))
}
