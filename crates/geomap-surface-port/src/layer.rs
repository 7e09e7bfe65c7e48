// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Visual layers: renderable proxies built from a shape's geometry.

use core::fmt;

use geojson::{Geometry, Value};

use crate::{Color, LatLngBounds, LayerStyle};

/// Identity of a visual layer.
///
/// Allocated once per layer by its owner; never reused.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(pub u64);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer#{}", self.0)
    }
}

/// Renderable proxy for one shape.
///
/// The bounds are computed once from the geometry at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct VisualLayer {
    id: LayerId,
    style: LayerStyle,
    bounds: Option<LatLngBounds>,
    label: Option<String>,
    geometry: Option<Geometry>,
}

impl VisualLayer {
    /// Build a layer for `geometry` with the given style.
    pub fn new(
        id: LayerId,
        geometry: Option<Geometry>,
        label: Option<String>,
        style: LayerStyle,
    ) -> Self {
        let bounds = geometry.as_ref().and_then(geometry_bounds);
        Self {
            id,
            style,
            bounds,
            label,
            geometry,
        }
    }

    /// Layer identity.
    pub fn id(&self) -> LayerId {
        self.id
    }

    /// Current style.
    pub fn style(&self) -> &LayerStyle {
        &self.style
    }

    /// Current stroke colour.
    pub fn color(&self) -> &Color {
        &self.style.color
    }

    /// Replace the stroke colour, keeping opacity and weight.
    pub fn set_color(&mut self, color: Color) {
        self.style.color = color;
    }

    /// Envelope of the geometry, if it has any coordinates.
    pub fn bounds(&self) -> Option<LatLngBounds> {
        self.bounds
    }

    /// Label copied from the shape when the layer was built.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Geometry to draw.
    pub fn geometry(&self) -> Option<&Geometry> {
        self.geometry.as_ref()
    }
}

/// Envelope of every position in a GeoJSON geometry.
pub(crate) fn geometry_bounds(geometry: &Geometry) -> Option<LatLngBounds> {
    value_bounds(&geometry.value)
}

fn value_bounds(value: &Value) -> Option<LatLngBounds> {
    match value {
        Value::Point(p) => LatLngBounds::from_positions([p.as_slice()]),
        Value::MultiPoint(ps) | Value::LineString(ps) => {
            LatLngBounds::from_positions(ps.iter().map(Vec::as_slice))
        }
        Value::MultiLineString(lines) | Value::Polygon(lines) => {
            LatLngBounds::from_positions(lines.iter().flatten().map(Vec::as_slice))
        }
        Value::MultiPolygon(polys) => {
            LatLngBounds::from_positions(polys.iter().flatten().flatten().map(Vec::as_slice))
        }
        Value::GeometryCollection(members) => members
            .iter()
            .filter_map(geometry_bounds)
            .reduce(|acc, b| acc.union(&b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Geometry {
        Geometry::new(Value::Polygon(vec![vec![
            vec![x0, y0],
            vec![x1, y0],
            vec![x1, y1],
            vec![x0, y1],
            vec![x0, y0],
        ]]))
    }

    #[test]
    fn test_polygon_bounds() {
        let layer = VisualLayer::new(
            LayerId(1),
            Some(square(10.0, 20.0, 11.0, 22.0)),
            None,
            LayerStyle::default(),
        );
        // GeoJSON is [lng, lat]; bounds are [lat, lng].
        assert_eq!(
            layer.bounds().map(|b| b.to_array()),
            Some([[20.0, 10.0], [22.0, 11.0]])
        );
    }

    #[test]
    fn test_collection_bounds_union() {
        let collection = Geometry::new(Value::GeometryCollection(vec![
            square(0.0, 0.0, 1.0, 1.0),
            Geometry::new(Value::Point(vec![6.0, 6.0])),
        ]));
        assert_eq!(
            geometry_bounds(&collection).map(|b| b.to_array()),
            Some([[0.0, 0.0], [6.0, 6.0]])
        );
    }

    #[test]
    fn test_missing_geometry_has_no_bounds() {
        let layer = VisualLayer::new(LayerId(2), None, None, LayerStyle::default());
        assert_eq!(layer.bounds(), None);
    }

    #[test]
    fn test_set_color_keeps_weight() {
        let mut layer = VisualLayer::new(LayerId(3), None, None, LayerStyle::default());
        let Ok(red) = Color::parse("#f00") else {
            unreachable!("valid colour literal")
        };
        layer.set_color(red.clone());
        assert_eq!(layer.color(), &red);
        assert!((layer.style().weight - 2.0).abs() < f32::EPSILON);
    }
}
