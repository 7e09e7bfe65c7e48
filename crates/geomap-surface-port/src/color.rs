// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Stroke colour and layer style types.

use core::fmt;
use core::str::FromStr;

use crate::ColorError;

/// Stroke colour assigned to a freshly created layer.
pub const DEFAULT_STROKE_COLOR: &str = "#1976d2";
/// Fill opacity assigned to a freshly created layer.
pub const DEFAULT_FILL_OPACITY: f32 = 0.4;
/// Stroke weight (pixels) assigned to a freshly created layer.
pub const DEFAULT_WEIGHT: f32 = 2.0;

/// CSS hex colour (`#rgb`, `#rrggbb` or `#rrggbbaa`).
///
/// Stored lower-cased so equality (and de-duplication) is by value:
/// `#1976D2` and `#1976d2` are the same colour.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct Color(String);

impl Color {
    /// Parse and normalise a hex colour.
    pub fn parse(raw: &str) -> Result<Self, ColorError> {
        let trimmed = raw.trim();
        let Some(digits) = trimmed.strip_prefix('#') else {
            return Err(ColorError::MissingHash(raw.to_owned()));
        };
        if !matches!(digits.len(), 3 | 6 | 8) {
            return Err(ColorError::BadLength(raw.to_owned()));
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::NotHex(raw.to_owned()));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    /// The normalised `#…` string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self(DEFAULT_STROKE_COLOR.to_owned())
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rendering style of a visual layer.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct LayerStyle {
    /// Stroke colour.
    pub color: Color,
    /// Fill opacity in `0.0..=1.0`.
    pub fill_opacity: f32,
    /// Stroke weight in pixels.
    pub weight: f32,
}

impl LayerStyle {
    /// Same style with a different stroke colour.
    pub fn with_color(&self, color: Color) -> Self {
        Self {
            color,
            ..self.clone()
        }
    }
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            color: Color::default(),
            fill_opacity: DEFAULT_FILL_OPACITY,
            weight: DEFAULT_WEIGHT,
        }
    }
}
