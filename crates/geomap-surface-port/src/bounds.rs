// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Geographic coordinates and bounding envelopes.

/// A latitude/longitude pair in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatLng {
    /// Latitude (y).
    pub lat: f64,
    /// Longitude (x).
    pub lng: f64,
}

impl LatLng {
    /// Create a coordinate.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Axis-aligned geographic envelope.
///
/// Invariant: `south_west` is component-wise <= `north_east`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct LatLngBounds {
    /// Minimum corner.
    pub south_west: LatLng,
    /// Maximum corner.
    pub north_east: LatLng,
}

impl LatLngBounds {
    /// Envelope spanning two corners given as `[lat, lng]`, in any order.
    pub fn new(a: [f64; 2], b: [f64; 2]) -> Self {
        Self {
            south_west: LatLng::new(a[0].min(b[0]), a[1].min(b[1])),
            north_east: LatLng::new(a[0].max(b[0]), a[1].max(b[1])),
        }
    }

    /// Degenerate envelope around a single point.
    pub fn from_point(point: LatLng) -> Self {
        Self {
            south_west: point,
            north_east: point,
        }
    }

    /// Envelope of GeoJSON positions (`[lng, lat, ..]`).
    ///
    /// Positions with fewer than two ordinates or non-finite values are
    /// skipped. Returns `None` when nothing usable remains.
    pub fn from_positions<'a, I>(positions: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a [f64]>,
    {
        positions
            .into_iter()
            .filter_map(|p| match p {
                [lng, lat, ..] if lng.is_finite() && lat.is_finite() => {
                    Some(Self::from_point(LatLng::new(*lat, *lng)))
                }
                _ => None,
            })
            .reduce(|acc, b| acc.union(&b))
    }

    /// Grow this envelope to cover `other`.
    pub fn extend(&mut self, other: &Self) {
        self.south_west.lat = self.south_west.lat.min(other.south_west.lat);
        self.south_west.lng = self.south_west.lng.min(other.south_west.lng);
        self.north_east.lat = self.north_east.lat.max(other.north_east.lat);
        self.north_east.lng = self.north_east.lng.max(other.north_east.lng);
    }

    /// Smallest envelope covering both.
    pub fn union(&self, other: &Self) -> Self {
        let mut out = *self;
        out.extend(other);
        out
    }

    /// Whether `point` lies inside (edges inclusive).
    pub fn contains(&self, point: LatLng) -> bool {
        (self.south_west.lat..=self.north_east.lat).contains(&point.lat)
            && (self.south_west.lng..=self.north_east.lng).contains(&point.lng)
    }

    /// Midpoint of the envelope.
    pub fn center(&self) -> LatLng {
        LatLng::new(
            self.south_west.lat.midpoint(self.north_east.lat),
            self.south_west.lng.midpoint(self.north_east.lng),
        )
    }

    /// Corners as `[[south, west], [north, east]]`.
    pub fn to_array(&self) -> [[f64; 2]; 2] {
        [
            [self.south_west.lat, self.south_west.lng],
            [self.north_east.lat, self.north_east.lng],
        ]
    }
}
