// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Map surface port contract for geomap.
//!
//! This crate defines the contract between the feature tree walker and a
//! map renderer. It owns no tree logic; that lives in `geomap-features`.
//!
//! # Design Principles
//!
//! - **Surfaces are dumb**: They attach, detach and restyle layers. No domain logic.
//! - **Layers are owned elsewhere**: The walker's side table owns every
//!   [`VisualLayer`]; a surface only holds a transient attachment.
//! - **Identity is a [`LayerId`]**: Reusing a layer means reusing its id.
//!
//! # Crate Features
//!
//! - `serde`: Serialize/Deserialize for the style and bounds types.

use thiserror::Error;

/// Error type for colour parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// The value did not start with `#`.
    #[error("colour must start with '#': {0:?}")]
    MissingHash(String),
    /// The value had a digit count other than 3, 6 or 8.
    #[error("colour must have 3, 6 or 8 hex digits: {0:?}")]
    BadLength(String),
    /// The value contained a non-hex character.
    #[error("colour contains a non-hex digit: {0:?}")]
    NotHex(String),
}

mod bounds;
mod color;
mod headless;
mod layer;
mod port;

pub use bounds::{LatLng, LatLngBounds};
pub use color::{Color, LayerStyle, DEFAULT_FILL_OPACITY, DEFAULT_STROKE_COLOR, DEFAULT_WEIGHT};
pub use headless::HeadlessSurface;
pub use layer::{LayerId, VisualLayer};
pub use port::MapSurface;
