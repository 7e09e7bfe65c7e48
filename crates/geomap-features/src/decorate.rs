// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Label and type assignment over a freshly loaded tree.
//!
//! Pre-order: each parent labels its children from the key that owns them
//! (field name, tier name, function expression) before descending. Shapes are
//! labelled with their GeoJSON `id`. Running it twice yields the same labels.

use crate::kind::NodeKind;
use crate::model::{
    FeatureRoot, Geo, GeoFeatures, GeoFunction, GeoQueryFeatures, GeoTerms, GeometryEncoding,
};

/// Label given to a manual geometry's submitted geometry.
pub const GEOMETRY_LABEL: &str = "Geometry";
/// Label given to a manual geometry's generated ranges.
pub const QUERY_RANGES_LABEL: &str = "Query Ranges";

/// Assign every descendant of `root` a label and a type tag.
pub fn decorate(root: &mut FeatureRoot) {
    match root {
        FeatureRoot::Query(query) => decorate_query(query),
        FeatureRoot::Geometry(features) => decorate_geometry_features(features),
    }
}

fn decorate_query(query: &mut GeoQueryFeatures) {
    query.type_name = Some(NodeKind::QueryFeatures);
    if let Some(fields) = query.geo_by_field.as_mut() {
        for (field, terms) in fields.iter_mut() {
            terms.label = Some(field.clone());
            terms.type_name = Some(NodeKind::Terms);
        }
        fields.values_mut().for_each(decorate_terms);
    }
    if let Some(functions) = query.functions.as_mut() {
        for function in functions.iter_mut() {
            function.label = Some(function.function.clone());
            function.type_name = Some(NodeKind::Function);
        }
        functions.iter_mut().for_each(decorate_function);
    }
}

fn decorate_geometry_features(features: &mut GeoFeatures) {
    features.type_name = Some(NodeKind::GeometryFeatures);
    if let Some(geometry) = features.geometry.as_mut() {
        geometry.label = Some(GEOMETRY_LABEL.to_owned());
        geometry.type_name = Some(NodeKind::Geometry);
        decorate_geo(geometry);
    }
    if let Some(ranges) = features.query_ranges.as_mut() {
        ranges.label = Some(QUERY_RANGES_LABEL.to_owned());
        ranges.type_name = Some(NodeKind::Terms);
        decorate_terms(ranges);
    }
}

fn decorate_terms(terms: &mut GeoTerms) {
    label_shapes(terms.geo.as_mut().and_then(|g| g.geo_json.as_mut()));
    if let Some(tiers) = terms.geo_by_tier.as_mut() {
        for (tier, geo) in tiers.iter_mut() {
            geo.label = Some(tier.clone());
            geo.type_name = Some(NodeKind::Geometry);
            decorate_geo(geo);
        }
    }
}

fn decorate_geo(geo: &mut Geo) {
    label_shapes(geo.geo_json.as_mut());
}

fn decorate_function(function: &mut GeoFunction) {
    label_shapes(function.geo_json.as_mut());
}

/// Shapes are terminal: they only receive their id as `properties.label`.
fn label_shapes(encoding: Option<&mut GeometryEncoding>) {
    let Some(encoding) = encoding else {
        return;
    };
    for shape in encoding.shapes_mut() {
        if let Some(id) = shape.id_string() {
            shape.set_label(id);
        }
    }
}
