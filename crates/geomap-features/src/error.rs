// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error type for feature payload ingestion and session management.

use thiserror::Error;

use crate::kind::NodeKind;
use crate::node::NodePath;

/// Failures surfaced by the walker and the store.
///
/// Tree traversal itself never fails: every node in a typed tree has a known
/// kind. Errors arise at the payload boundary and on session lookups.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// The node declared a type tag that is not part of the closed set.
    #[error("unrecognized feature node type {0:?}")]
    UnknownNodeType(String),
    /// The node carried neither `typeName` nor `type`.
    #[error("feature node has no type discriminator")]
    MissingNodeType,
    /// The node's kind cannot stand at the root of a session.
    #[error("{0} cannot be loaded as a session root")]
    NotARoot(NodeKind),
    /// The payload did not match the shape of its declared kind.
    #[error("malformed {kind} payload: {source}")]
    Payload {
        /// Kind the payload was parsed as.
        kind: NodeKind,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
    /// Raw text was not JSON at all.
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A GeoJSON object other than `Feature`/`FeatureCollection` was supplied.
    #[error("unsupported geometry encoding {0:?}, expected Feature or FeatureCollection")]
    UnsupportedGeometry(String),
    /// No session with that id.
    #[error("no session named {0:?}")]
    SessionNotFound(String),
    /// A rename would overwrite another session.
    #[error("a session named {0:?} already exists")]
    SessionExists(String),
    /// The path does not lead to a node.
    #[error("no node at path {path} in session {session:?}")]
    NodeNotFound {
        /// Session searched.
        session: String,
        /// Path that failed.
        path: NodePath,
    },
    /// A path string could not be parsed.
    #[error("invalid node path {0:?}")]
    BadPath(String),
}
