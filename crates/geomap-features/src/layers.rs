// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Visual layer side table and the tree-wide layer operations.
//!
//! Each shape owns at most one [`VisualLayer`], created lazily on first
//! enable and kept until [`LayerManager::release_layers`]. Per shape:
//!
//! ```text
//! Unmaterialized ─enable(false)→ Created-Detached ─enable(true)→ Attached
//!        └────────────enable(true)─────────────────────────────────┘
//!                                   Attached ⇄ Detached (enable / disable)
//! ```
//!
//! Every operation is a fold over [`FeatureRef::shapes`]; accumulators are
//! locals of the call, so operations never interfere with each other.

use std::collections::HashMap;

use geomap_surface_port::{Color, LatLngBounds, LayerId, LayerStyle, MapSurface, VisualLayer};
use tracing::debug;

use crate::model::{Shape, ShapeKey};
use crate::node::FeatureRef;

/// Owner of every visual layer, keyed by shape.
#[derive(Debug)]
pub struct LayerManager {
    layers: HashMap<ShapeKey, VisualLayer>,
    style: LayerStyle,
    next_id: u64,
}

impl Default for LayerManager {
    fn default() -> Self {
        Self::new(LayerStyle::default())
    }
}

impl LayerManager {
    /// Empty table; new layers get `style`.
    pub fn new(style: LayerStyle) -> Self {
        Self {
            layers: HashMap::new(),
            style,
            next_id: 1,
        }
    }

    /// Style given to newly created layers.
    pub fn default_style(&self) -> &LayerStyle {
        &self.style
    }

    /// Number of materialised layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether no layer has been materialised.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// The layer owned by `shape`, if materialised.
    pub fn layer(&self, shape: ShapeKey) -> Option<&VisualLayer> {
        self.layers.get(&shape)
    }

    /// Materialise a layer for every shape under `node` and, when
    /// `attach_to_map` is set, attach every one not already attached.
    ///
    /// Existing layers are reused, never rebuilt.
    pub fn enable_layers<S>(&mut self, node: FeatureRef<'_>, surface: &mut S, attach_to_map: bool)
    where
        S: MapSurface + ?Sized,
    {
        for shape in node.shapes() {
            let layer = self.materialise(shape);
            if attach_to_map && !surface.has_layer(layer.id()) {
                debug!(layer = %layer.id(), label = layer.label(), "attaching layer");
                surface.add_layer(layer);
            }
        }
    }

    /// Materialise layers under `node` without showing them.
    pub fn create_layers(&mut self, node: FeatureRef<'_>) {
        for shape in node.shapes() {
            self.materialise(shape);
        }
    }

    /// Detach every attached layer under `node`. Layers stay in the table.
    pub fn disable_layers<S>(&self, node: FeatureRef<'_>, surface: &mut S)
    where
        S: MapSurface + ?Sized,
    {
        for layer in self.layers_under(node) {
            if surface.has_layer(layer.id()) {
                debug!(layer = %layer.id(), "detaching layer");
                surface.remove_layer(layer.id());
            }
        }
    }

    /// Whether any layer under `node` is attached.
    pub fn layers_visible<S>(&self, node: FeatureRef<'_>, surface: &S) -> bool
    where
        S: MapSurface + ?Sized,
    {
        self.layers_under(node)
            .any(|layer| surface.has_layer(layer.id()))
    }

    /// Envelope of every attached layer under `node`; `None` when none is
    /// attached (or none of the attached ones has coordinates).
    pub fn visible_bounds<S>(&self, node: FeatureRef<'_>, surface: &S) -> Option<LatLngBounds>
    where
        S: MapSurface + ?Sized,
    {
        self.layers_under(node)
            .filter(|layer| surface.has_layer(layer.id()))
            .filter_map(VisualLayer::bounds)
            .reduce(|mut acc, bounds| {
                acc.extend(&bounds);
                acc
            })
    }

    /// Distinct colours of the materialised layers under `node`, in
    /// first-seen order.
    pub fn colors(&self, node: FeatureRef<'_>) -> Vec<Color> {
        let mut seen: Vec<Color> = Vec::new();
        for layer in self.layers_under(node) {
            if !seen.contains(layer.color()) {
                seen.push(layer.color().clone());
            }
        }
        seen
    }

    /// The single colour shared by every layer under `node`; `None` when the
    /// layers disagree or there are none.
    pub fn uniform_color(&self, node: FeatureRef<'_>) -> Option<Color> {
        let mut colors = self.colors(node);
        if colors.len() == 1 {
            colors.pop()
        } else {
            None
        }
    }

    /// Recolour every materialised layer under `node`; attached ones are
    /// restyled on the surface.
    pub fn set_color<S>(&mut self, node: FeatureRef<'_>, color: &Color, surface: &mut S)
    where
        S: MapSurface + ?Sized,
    {
        for shape in node.shapes() {
            let Some(layer) = self.layers.get_mut(&shape.key()) else {
                continue;
            };
            layer.set_color(color.clone());
            if surface.has_layer(layer.id()) {
                debug!(layer = %layer.id(), %color, "restyling layer");
                surface.restyle_layer(layer);
            }
        }
    }

    /// Detach and drop every layer under `node`.
    ///
    /// Returns the number of layers dropped. Shapes under `node` start over
    /// as unmaterialised.
    pub fn release_layers<S>(&mut self, node: FeatureRef<'_>, surface: &mut S) -> usize
    where
        S: MapSurface + ?Sized,
    {
        let mut released = 0;
        for shape in node.shapes() {
            let Some(layer) = self.layers.remove(&shape.key()) else {
                continue;
            };
            if surface.has_layer(layer.id()) {
                surface.remove_layer(layer.id());
            }
            released += 1;
        }
        released
    }

    fn layers_under<'s>(&'s self, node: FeatureRef<'s>) -> impl Iterator<Item = &'s VisualLayer> {
        let layers = &self.layers;
        node.shapes().filter_map(move |shape| layers.get(&shape.key()))
    }

    fn materialise(&mut self, shape: &Shape) -> &VisualLayer {
        let style = &self.style;
        let next_id = &mut self.next_id;
        self.layers.entry(shape.key()).or_insert_with(|| {
            let id = LayerId(*next_id);
            *next_id += 1;
            debug!(layer = %id, shape = shape.key().get(), "creating layer");
            VisualLayer::new(
                id,
                shape.geometry().cloned(),
                shape.label().map(str::to_owned),
                style.clone(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::kind::NodeKind;
    use crate::model::FeatureRoot;
    use geomap_surface_port::HeadlessSurface;
    use serde_json::json;

    fn square(id: &str, lat0: f64, lng0: f64, lat1: f64, lng1: f64) -> serde_json::Value {
        json!({
            "type": "Feature",
            "id": id,
            "geometry": {"type": "Polygon", "coordinates": [[
                [lng0, lat0], [lng1, lat0], [lng1, lat1], [lng0, lat1], [lng0, lat0]
            ]]},
            "properties": {}
        })
    }

    fn two_leaf_root() -> FeatureRoot {
        FeatureRoot::from_value_as(
            NodeKind::GeometryFeatures,
            json!({"geometry": {"geoJson": {"type": "FeatureCollection", "features": [
                square("a", 0.0, 0.0, 1.0, 1.0),
                square("b", 5.0, 5.0, 6.0, 6.0)
            ]}}}),
        )
        .unwrap()
    }

    #[test]
    fn create_then_enable_reuses_layers() {
        let root = two_leaf_root();
        let mut layers = LayerManager::default();
        let mut surface = HeadlessSurface::new();

        layers.create_layers(root.view());
        assert_eq!(layers.len(), 2);
        assert_eq!(surface.layer_count(), 0);
        let before: Vec<_> = root
            .view()
            .shapes()
            .map(|s| layers.layer(s.key()).unwrap().id())
            .collect();

        layers.enable_layers(root.view(), &mut surface, true);
        assert_eq!(layers.len(), 2);
        assert_eq!(surface.attached_ids(), before);
    }

    #[test]
    fn bounds_only_count_attached_layers() {
        let root = two_leaf_root();
        let mut layers = LayerManager::default();
        let mut surface = HeadlessSurface::new();
        layers.create_layers(root.view());
        assert_eq!(layers.visible_bounds(root.view(), &surface), None);

        let first = root.view().children()[0].children()[0];
        layers.enable_layers(first, &mut surface, true);
        assert_eq!(
            layers
                .visible_bounds(root.view(), &surface)
                .map(|b| b.to_array()),
            Some([[0.0, 0.0], [1.0, 1.0]])
        );

        layers.enable_layers(root.view(), &mut surface, true);
        assert_eq!(
            layers
                .visible_bounds(root.view(), &surface)
                .map(|b| b.to_array()),
            Some([[0.0, 0.0], [6.0, 6.0]])
        );
    }

    #[test]
    fn disable_detaches_without_dropping() {
        let root = two_leaf_root();
        let mut layers = LayerManager::default();
        let mut surface = HeadlessSurface::new();
        layers.enable_layers(root.view(), &mut surface, true);
        assert!(layers.layers_visible(root.view(), &surface));

        layers.disable_layers(root.view(), &mut surface);
        assert!(!layers.layers_visible(root.view(), &surface));
        assert_eq!(layers.len(), 2);
        assert_eq!(surface.remove_count, 2);
    }

    #[test]
    fn uniform_color_tracks_set_color() {
        let root = two_leaf_root();
        let mut layers = LayerManager::default();
        let mut surface = HeadlessSurface::new();
        assert_eq!(layers.uniform_color(root.view()), None);

        layers.enable_layers(root.view(), &mut surface, true);
        assert_eq!(layers.uniform_color(root.view()), Some(Color::default()));

        let red = Color::parse("#ff0000").unwrap();
        let second = root.view().children()[0].children()[1];
        layers.set_color(second, &red, &mut surface);
        assert_eq!(layers.uniform_color(root.view()), None);
        assert_eq!(layers.colors(root.view()), [Color::default(), red.clone()]);
        assert_eq!(surface.restyle_count, 1);

        layers.set_color(root.view(), &red, &mut surface);
        assert_eq!(layers.uniform_color(root.view()), Some(red));
    }

    #[test]
    fn set_color_skips_unmaterialised_shapes() {
        let root = two_leaf_root();
        let mut layers = LayerManager::default();
        let mut surface = HeadlessSurface::new();
        layers.set_color(root.view(), &Color::parse("#000").unwrap(), &mut surface);
        assert!(layers.is_empty());
    }

    #[test]
    fn new_layers_use_configured_style() {
        let root = two_leaf_root();
        let green = Color::parse("#00ff00").unwrap();
        let mut layers = LayerManager::new(LayerStyle::default().with_color(green.clone()));
        layers.create_layers(root.view());
        assert_eq!(layers.uniform_color(root.view()), Some(green));
    }

    #[test]
    fn release_drops_and_detaches() {
        let root = two_leaf_root();
        let mut layers = LayerManager::default();
        let mut surface = HeadlessSurface::new();
        layers.enable_layers(root.view(), &mut surface, true);

        assert_eq!(layers.release_layers(root.view(), &mut surface), 2);
        assert!(layers.is_empty());
        assert_eq!(surface.layer_count(), 0);
    }
}
