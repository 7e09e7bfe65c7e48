// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Borrowed tree view: child enumeration and depth-first traversal.
//!
//! [`FeatureRef`] is the single dispatch point. Every tree-wide operation is
//! "enumerate children, recurse or act, combine", and only
//! [`FeatureRef::children`] knows which children each kind has.

use core::fmt;
use core::str::FromStr;

use crate::kind::NodeKind;
use crate::model::{
    FeatureRoot, Geo, GeoByField, GeoByTier, GeoFeatures, GeoFunction, GeoQueryFeatures,
    GeoTerms, GeometryEncoding, Shape,
};
use crate::FeatureError;

/// Label of the fields delegate.
pub const BY_FIELD_LABEL: &str = "Geo By Field";
/// Label of the functions delegate.
pub const FUNCTIONS_LABEL: &str = "Geo Functions";
/// Label of the tiers delegate.
pub const BY_TIER_LABEL: &str = "Geo By Tier";

/// A borrowed node of a feature tree.
///
/// The three delegate variants wrap a mapping or list so it gets its own
/// place in the tree; they have no payload object of their own.
#[derive(Clone, Copy, Debug)]
pub enum FeatureRef<'a> {
    /// Query result root.
    QueryFeatures(&'a GeoQueryFeatures),
    /// Manual geometry root.
    GeometryFeatures(&'a GeoFeatures),
    /// Delegate over a query's fields.
    ByField(&'a GeoByField),
    /// A field's terms.
    Terms(&'a GeoTerms),
    /// Delegate over a term's tiers.
    ByTier(&'a GeoByTier),
    /// Delegate over a query's function results.
    Functions(&'a [GeoFunction]),
    /// Wrapped GeoJSON.
    Geometry(&'a Geo),
    /// One function result.
    Function(&'a GeoFunction),
    /// Leaf shape.
    Shape(&'a Shape),
}

impl<'a> FeatureRef<'a> {
    /// Node kind.
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::QueryFeatures(_) => NodeKind::QueryFeatures,
            Self::GeometryFeatures(_) => NodeKind::GeometryFeatures,
            Self::ByField(_) => NodeKind::ByField,
            Self::Terms(_) => NodeKind::Terms,
            Self::ByTier(_) => NodeKind::ByTier,
            Self::Functions(_) => NodeKind::Functions,
            Self::Geometry(_) => NodeKind::Geometry,
            Self::Function(_) => NodeKind::Function,
            Self::Shape(_) => NodeKind::Shape,
        }
    }

    /// Display label; empty when the node has not been labelled.
    pub fn label(&self) -> &'a str {
        match *self {
            Self::QueryFeatures(q) => q.label.as_deref().unwrap_or_default(),
            Self::GeometryFeatures(g) => g.label.as_deref().unwrap_or_default(),
            Self::ByField(_) => BY_FIELD_LABEL,
            Self::Terms(t) => t.label.as_deref().unwrap_or_default(),
            Self::ByTier(_) => BY_TIER_LABEL,
            Self::Functions(_) => FUNCTIONS_LABEL,
            Self::Geometry(g) => g.label.as_deref().unwrap_or_default(),
            Self::Function(f) => f.label.as_deref().unwrap_or_default(),
            Self::Shape(s) => s.label().unwrap_or_default(),
        }
    }

    /// Immediate children, in order. Empty for shapes.
    ///
    /// Delegates are only produced for present, non-empty mappings and lists.
    pub fn children(&self) -> Vec<FeatureRef<'a>> {
        let mut out = Vec::new();
        match *self {
            Self::QueryFeatures(q) => {
                if let Some(fields) = q.geo_by_field.as_ref().filter(|m| !m.is_empty()) {
                    out.push(Self::ByField(fields));
                }
                if let Some(functions) = q.functions.as_deref().filter(|f| !f.is_empty()) {
                    out.push(Self::Functions(functions));
                }
            }
            Self::GeometryFeatures(g) => {
                out.extend(g.geometry.as_ref().map(Self::Geometry));
                out.extend(g.query_ranges.as_ref().map(Self::Terms));
            }
            Self::ByField(fields) => out.extend(fields.values().map(Self::Terms)),
            Self::Terms(t) => {
                out.extend(encoded_shapes(t.geo.as_ref().and_then(|g| g.geo_json.as_ref())));
                if let Some(tiers) = t.geo_by_tier.as_ref().filter(|m| !m.is_empty()) {
                    out.push(Self::ByTier(tiers));
                }
            }
            Self::ByTier(tiers) => out.extend(tiers.values().map(Self::Geometry)),
            Self::Functions(functions) => out.extend(functions.iter().map(Self::Function)),
            Self::Geometry(g) => out.extend(encoded_shapes(g.geo_json.as_ref())),
            Self::Function(f) => out.extend(encoded_shapes(f.geo_json.as_ref())),
            Self::Shape(_) => {}
        }
        out
    }

    /// Whether the node is a shape.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Shape(_))
    }

    /// The shape, when this node is one.
    pub fn as_shape(&self) -> Option<&'a Shape> {
        match *self {
            Self::Shape(shape) => Some(shape),
            _ => None,
        }
    }

    /// Follow `path` from this node.
    pub fn descend(&self, path: &NodePath) -> Option<FeatureRef<'a>> {
        path.indices()
            .iter()
            .try_fold(*self, |node, &i| node.children().get(i).copied())
    }

    /// Pre-order depth-first traversal including this node.
    pub fn descendants(&self) -> DepthFirst<'a> {
        DepthFirst {
            stack: vec![(0, *self)],
        }
    }

    /// Every shape below (or at) this node, in traversal order.
    pub fn shapes(&self) -> impl Iterator<Item = &'a Shape> {
        self.descendants().filter_map(|(_, node)| node.as_shape())
    }

    /// Pre-order listing of every node with its path relative to this one.
    pub fn outline(&self) -> Vec<(NodePath, FeatureRef<'a>)> {
        let mut out = Vec::new();
        let mut stack = vec![(NodePath::root(), *self)];
        while let Some((path, node)) = stack.pop() {
            let children = node.children();
            stack.extend(
                children
                    .into_iter()
                    .enumerate()
                    .rev()
                    .map(|(i, child)| (path.child(i), child)),
            );
            out.push((path, node));
        }
        out
    }
}

fn encoded_shapes(encoding: Option<&GeometryEncoding>) -> impl Iterator<Item = FeatureRef<'_>> {
    encoding
        .map(GeometryEncoding::shapes)
        .unwrap_or_default()
        .iter()
        .map(FeatureRef::Shape)
}

impl<'a> From<&'a FeatureRoot> for FeatureRef<'a> {
    fn from(root: &'a FeatureRoot) -> Self {
        match root {
            FeatureRoot::Query(q) => Self::QueryFeatures(q),
            FeatureRoot::Geometry(g) => Self::GeometryFeatures(g),
        }
    }
}

impl FeatureRoot {
    /// Borrowed view of the root node.
    pub fn view(&self) -> FeatureRef<'_> {
        FeatureRef::from(self)
    }
}

/// Pre-order depth-first iterator yielding `(depth, node)`.
///
/// Driven by an explicit stack, so it holds no state outside itself and
/// any number of traversals may run side by side.
#[derive(Debug)]
pub struct DepthFirst<'a> {
    stack: Vec<(usize, FeatureRef<'a>)>,
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = (usize, FeatureRef<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        let children = node.children();
        self.stack
            .extend(children.into_iter().rev().map(|child| (depth + 1, child)));
        Some((depth, node))
    }
}

/// Child-index path from a root to a node. The empty path is the root.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    /// The root path.
    pub fn root() -> Self {
        Self::default()
    }

    /// Path to this node's `index`-th child.
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Child indices from the root.
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Number of steps from the root.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str(".");
        }
        for (n, index) in self.0.iter().enumerate() {
            if n > 0 {
                f.write_str("/")?;
            }
            write!(f, "{index}")?;
        }
        Ok(())
    }
}

impl FromStr for NodePath {
    type Err = FeatureError;

    /// Parses `"0/2/1"`; `""`, `"."` and `"/"` are the root.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_matches('/');
        if trimmed.is_empty() || trimmed == "." {
            return Ok(Self::root());
        }
        trimmed
            .split('/')
            .map(str::parse::<usize>)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
            .map_err(|_| FeatureError::BadPath(s.to_owned()))
    }
}
