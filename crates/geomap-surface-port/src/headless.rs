// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Headless adapter for testing and inspecting MapSurface users.
//!
//! HeadlessSurface tracks attached layers in a BTreeMap without any drawing.
//! Use it to verify attach/detach sequences and styling.

use std::collections::BTreeMap;

use crate::{LatLngBounds, LayerId, MapSurface, VisualLayer};

/// Headless map surface.
///
/// Implements `MapSurface` by keeping a snapshot of each attached layer.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    /// Currently attached layers, by id.
    attached: BTreeMap<LayerId, VisualLayer>,
    /// Number of effective `add_layer` calls.
    pub add_count: u32,
    /// Number of effective `remove_layer` calls.
    pub remove_count: u32,
    /// Number of `restyle_layer` calls on attached layers.
    pub restyle_count: u32,
    /// Last viewport requested via `fit_bounds`.
    pub viewport: Option<LatLngBounds>,
}

impl HeadlessSurface {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of attached layers.
    pub fn layer_count(&self) -> usize {
        self.attached.len()
    }

    /// Ids of the attached layers, ascending.
    pub fn attached_ids(&self) -> Vec<LayerId> {
        self.attached.keys().copied().collect()
    }

    /// Snapshot of an attached layer as last added or restyled.
    pub fn get_layer(&self, id: LayerId) -> Option<&VisualLayer> {
        self.attached.get(&id)
    }

    /// Iterate attached layers in id order.
    pub fn layers(&self) -> impl Iterator<Item = &VisualLayer> {
        self.attached.values()
    }

    /// Detach everything.
    pub fn clear(&mut self) {
        self.attached.clear();
    }
}

impl MapSurface for HeadlessSurface {
    fn has_layer(&self, layer: LayerId) -> bool {
        self.attached.contains_key(&layer)
    }

    fn add_layer(&mut self, layer: &VisualLayer) {
        if self.attached.contains_key(&layer.id()) {
            return;
        }
        self.attached.insert(layer.id(), layer.clone());
        self.add_count += 1;
    }

    fn remove_layer(&mut self, layer: LayerId) {
        if self.attached.remove(&layer).is_some() {
            self.remove_count += 1;
        }
    }

    fn restyle_layer(&mut self, layer: &VisualLayer) {
        if let Some(slot) = self.attached.get_mut(&layer.id()) {
            *slot = layer.clone();
            self.restyle_count += 1;
        }
    }

    fn fit_bounds(&mut self, bounds: &LatLngBounds) {
        self.viewport = Some(*bounds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, LayerStyle};

    fn make_layer(id: u64) -> VisualLayer {
        VisualLayer::new(
            LayerId(id),
            None,
            Some(format!("shape {id}")),
            LayerStyle::default(),
        )
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut surface = HeadlessSurface::new();
        let layer = make_layer(1);
        surface.add_layer(&layer);
        surface.add_layer(&layer);
        assert_eq!(surface.layer_count(), 1);
        assert_eq!(surface.add_count, 1);
        assert!(surface.has_layer(LayerId(1)));
    }

    #[test]
    fn test_remove_unattached_is_noop() {
        let mut surface = HeadlessSurface::new();
        surface.remove_layer(LayerId(9));
        assert_eq!(surface.remove_count, 0);
    }

    #[test]
    fn test_restyle_only_touches_attached() {
        let mut surface = HeadlessSurface::new();
        let mut attached = make_layer(1);
        let mut detached = make_layer(2);
        surface.add_layer(&attached);

        let Ok(red) = Color::parse("#ff0000") else {
            unreachable!("valid colour literal")
        };
        attached.set_color(red.clone());
        detached.set_color(red.clone());
        surface.restyle_layer(&attached);
        surface.restyle_layer(&detached);

        assert_eq!(surface.restyle_count, 1);
        assert_eq!(
            surface.get_layer(LayerId(1)).map(VisualLayer::color),
            Some(&red)
        );
        assert!(!surface.has_layer(LayerId(2)));
    }

    #[test]
    fn test_fit_bounds_records_viewport() {
        let mut surface = HeadlessSurface::new();
        let bounds = LatLngBounds::new([0.0, 0.0], [1.0, 1.0]);
        surface.fit_bounds(&bounds);
        assert_eq!(surface.viewport, Some(bounds));
    }

    #[test]
    fn test_attached_ids_sorted() {
        let mut surface = HeadlessSurface::new();
        surface.add_layer(&make_layer(5));
        surface.add_layer(&make_layer(2));
        assert_eq!(surface.attached_ids(), vec![LayerId(2), LayerId(5)]);
        surface.clear();
        assert_eq!(surface.layer_count(), 0);
    }
}
