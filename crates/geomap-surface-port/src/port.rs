// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Map surface port trait defining the renderer contract.

use crate::{LatLngBounds, LayerId, VisualLayer};

/// Map surface port trait.
///
/// Implementors hold a transient attachment of layers that are owned by the
/// walker's layer table. No tree knowledge, no layer ownership.
///
/// # Design
///
/// This trait defines a hexagonal port for map rendering. The domain (the
/// feature tree walker) decides which layers should be shown; adapters
/// (a web map, a headless test double) implement this trait to show them.
///
/// # Attachment Semantics
///
/// `add_layer` on an attached layer and `remove_layer` on a detached one are
/// both no-ops. Callers still check `has_layer` first so adapters with
/// stricter backends never see redundant calls.
pub trait MapSurface {
    /// Whether the layer is currently attached.
    fn has_layer(&self, layer: LayerId) -> bool;

    /// Attach a layer.
    fn add_layer(&mut self, layer: &VisualLayer);

    /// Detach a layer. The layer object itself is untouched.
    fn remove_layer(&mut self, layer: LayerId);

    /// An attached layer's style changed; redraw it.
    fn restyle_layer(&mut self, layer: &VisualLayer);

    /// Move the viewport so `bounds` is visible.
    fn fit_bounds(&mut self, bounds: &LatLngBounds);
}
