// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Session map: loaded results keyed by session id, driving the layer table.

use std::collections::BTreeMap;

use geomap_app_core::{MapPrefs, SessionNaming};
use geomap_surface_port::{Color, LatLngBounds, MapSurface};
use serde_json::Value;
use tracing::info;

use crate::decorate::decorate;
use crate::kind::NodeKind;
use crate::layers::LayerManager;
use crate::model::{FeatureRoot, GeoFeatures, GeoQueryFeatures};
use crate::node::{FeatureRef, NodePath};
use crate::FeatureError;

/// How a query result was obtained.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryOrigin {
    /// Evaluated from a query plan.
    Plan {
        /// The plan text.
        query: String,
    },
    /// Looked up by the id of a query already run.
    QueryId {
        /// The looked-up id.
        query_id: String,
    },
}

/// Which endpoint a raw payload came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionKind {
    /// Query plan result.
    Query,
    /// Query id lookup result.
    Lookup,
    /// Manual geometry result.
    Geometry,
}

impl SessionKind {
    /// Root kind of payloads from this endpoint.
    pub fn root_kind(self) -> NodeKind {
        match self {
            Self::Query | Self::Lookup => NodeKind::QueryFeatures,
            Self::Geometry => NodeKind::GeometryFeatures,
        }
    }
}

/// Loaded sessions plus the layers they own and the surface showing them.
#[derive(Debug)]
pub struct FeatureStore<S> {
    sessions: BTreeMap<String, FeatureRoot>,
    layers: LayerManager,
    naming: SessionNaming,
    surface: S,
}

impl<S: MapSurface> FeatureStore<S> {
    /// Empty store with default naming and style.
    pub fn new(surface: S) -> Self {
        Self::from_prefs(&MapPrefs::default(), surface)
    }

    /// Empty store using the naming and layer style in `prefs`.
    pub fn from_prefs(prefs: &MapPrefs, surface: S) -> Self {
        Self {
            sessions: BTreeMap::new(),
            layers: LayerManager::new(prefs.layer_style.clone()),
            naming: prefs.naming.clone(),
            surface,
        }
    }

    /// The map surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The layer table.
    pub fn layers(&self) -> &LayerManager {
        &self.layers
    }

    /// Number of loaded sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no session is loaded.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Session ids in order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.sessions.keys().map(String::as_str)
    }

    /// Sessions in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureRoot)> {
        self.sessions.iter().map(|(id, root)| (id.as_str(), root))
    }

    /// A session's root.
    pub fn get(&self, id: &str) -> Option<&FeatureRoot> {
        self.sessions.get(id)
    }

    /// The node at `path` in session `id`.
    pub fn node(&self, id: &str, path: &NodePath) -> Result<FeatureRef<'_>, FeatureError> {
        locate(&self.sessions, id, path)
    }

    /// Load a query result. Function results are shown straight away; every
    /// other layer is created hidden.
    pub fn load_query(&mut self, mut payload: GeoQueryFeatures, origin: QueryOrigin) -> String {
        let prefix = match origin {
            QueryOrigin::Plan { query } => {
                payload.query = Some(query);
                self.naming.query.clone()
            }
            QueryOrigin::QueryId { query_id } => {
                payload.query_id = Some(query_id);
                self.naming.lookup.clone()
            }
        };
        self.insert(payload.into(), &prefix)
    }

    /// Load a manual geometry result. The submitted geometry is shown
    /// straight away; query ranges are created hidden.
    pub fn load_geometry(&mut self, payload: GeoFeatures) -> String {
        let prefix = self.naming.geometry.clone();
        self.insert(payload.into(), &prefix)
    }

    /// Parse and load a raw payload from the endpoint `kind`.
    ///
    /// The payload's own `query`/`queryId` are kept as its origin.
    pub fn load_json(&mut self, kind: SessionKind, raw: &str) -> Result<String, FeatureError> {
        let value: Value = serde_json::from_str(raw)?;
        let root = FeatureRoot::from_value_as(kind.root_kind(), value)?;
        let prefix = match kind {
            SessionKind::Query => &self.naming.query,
            SessionKind::Lookup => &self.naming.lookup,
            SessionKind::Geometry => &self.naming.geometry,
        }
        .clone();
        Ok(self.insert(root, &prefix))
    }

    /// Hide and drop every layer of session `id`, then forget it.
    pub fn delete(&mut self, id: &str) -> Result<(), FeatureError> {
        let root = self
            .sessions
            .remove(id)
            .ok_or_else(|| FeatureError::SessionNotFound(id.to_owned()))?;
        self.layers.disable_layers(root.view(), &mut self.surface);
        let released = self.layers.release_layers(root.view(), &mut self.surface);
        info!(session = id, released, "deleted session");
        Ok(())
    }

    /// Move session `id` to `new_id`, which also becomes its label.
    pub fn rename(&mut self, id: &str, new_id: &str) -> Result<(), FeatureError> {
        if !self.sessions.contains_key(id) {
            return Err(FeatureError::SessionNotFound(id.to_owned()));
        }
        if id != new_id && self.sessions.contains_key(new_id) {
            return Err(FeatureError::SessionExists(new_id.to_owned()));
        }
        let Some(mut root) = self.sessions.remove(id) else {
            return Err(FeatureError::SessionNotFound(id.to_owned()));
        };
        root.assign_id(new_id);
        self.sessions.insert(new_id.to_owned(), root);
        info!(from = id, to = new_id, "renamed session");
        Ok(())
    }

    /// Show every layer under the node.
    pub fn enable(&mut self, id: &str, path: &NodePath) -> Result<(), FeatureError> {
        let node = locate(&self.sessions, id, path)?;
        self.layers.enable_layers(node, &mut self.surface, true);
        Ok(())
    }

    /// Hide every layer under the node.
    pub fn disable(&mut self, id: &str, path: &NodePath) -> Result<(), FeatureError> {
        let node = locate(&self.sessions, id, path)?;
        self.layers.disable_layers(node, &mut self.surface);
        Ok(())
    }

    /// Whether any layer under the node is shown.
    pub fn is_visible(&self, id: &str, path: &NodePath) -> Result<bool, FeatureError> {
        let node = locate(&self.sessions, id, path)?;
        Ok(self.layers.layers_visible(node, &self.surface))
    }

    /// Envelope of the shown layers under the node.
    pub fn visible_bounds(
        &self,
        id: &str,
        path: &NodePath,
    ) -> Result<Option<LatLngBounds>, FeatureError> {
        let node = locate(&self.sessions, id, path)?;
        Ok(self.layers.visible_bounds(node, &self.surface))
    }

    /// The colour shared by every layer under the node, if there is one.
    pub fn uniform_color(&self, id: &str, path: &NodePath) -> Result<Option<Color>, FeatureError> {
        let node = locate(&self.sessions, id, path)?;
        Ok(self.layers.uniform_color(node))
    }

    /// Recolour every layer under the node.
    pub fn set_color(
        &mut self,
        id: &str,
        path: &NodePath,
        color: &Color,
    ) -> Result<(), FeatureError> {
        let node = locate(&self.sessions, id, path)?;
        self.layers.set_color(node, color, &mut self.surface);
        Ok(())
    }

    /// Fit the surface viewport to the shown layers under the node.
    ///
    /// Returns the bounds fitted, or `None` (viewport untouched) when nothing
    /// under the node is shown.
    pub fn zoom_to_visible(
        &mut self,
        id: &str,
        path: &NodePath,
    ) -> Result<Option<LatLngBounds>, FeatureError> {
        let node = locate(&self.sessions, id, path)?;
        let bounds = self.layers.visible_bounds(node, &self.surface);
        if let Some(bounds) = &bounds {
            self.surface.fit_bounds(bounds);
        }
        Ok(bounds)
    }

    fn insert(&mut self, mut root: FeatureRoot, prefix: &str) -> String {
        let id = self.next_id(prefix);
        root.assign_id(&id);
        decorate(&mut root);
        self.layers.create_layers(root.view());
        for branch in initially_shown(&root) {
            self.layers.enable_layers(branch, &mut self.surface, true);
        }
        info!(
            session = %id,
            kind = %root.kind(),
            layers = root.view().shapes().count(),
            "loaded session"
        );
        self.sessions.insert(id.clone(), root);
        id
    }

    fn next_id(&self, prefix: &str) -> String {
        let mut n: u64 = 1;
        loop {
            let id = format!("{prefix}{n}");
            if !self.sessions.contains_key(&id) {
                return id;
            }
            n += 1;
        }
    }
}

/// Branches attached on load: a query's function results, a manual
/// geometry's submitted geometry.
fn initially_shown(root: &FeatureRoot) -> Vec<FeatureRef<'_>> {
    match root {
        FeatureRoot::Query(query) => query
            .functions
            .iter()
            .flatten()
            .map(FeatureRef::Function)
            .collect(),
        FeatureRoot::Geometry(features) => {
            features.geometry.iter().map(FeatureRef::Geometry).collect()
        }
    }
}

fn locate<'s>(
    sessions: &'s BTreeMap<String, FeatureRoot>,
    id: &str,
    path: &NodePath,
) -> Result<FeatureRef<'s>, FeatureError> {
    let root = sessions
        .get(id)
        .ok_or_else(|| FeatureError::SessionNotFound(id.to_owned()))?;
    root.view()
        .descend(path)
        .ok_or_else(|| FeatureError::NodeNotFound {
            session: id.to_owned(),
            path: path.clone(),
        })
}
