//! Cell identifiers and point types
//!
//! All coordinates are WGS84 degrees, always ordered (latitude, longitude).

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of one hexagonal grid cell
///
/// Equality is string equality. The identifier is not validated on
/// construction; geometry lookups validate it through [`CellId::parse`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellId(String);

impl CellId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Validate the identifier as a grid index
    pub fn parse(&self) -> crate::Result<h3o::CellIndex> {
        self.0
            .parse::<h3o::CellIndex>()
            .map_err(|_| crate::Error::InvalidCellId(self.0.clone()))
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CellId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CellId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<h3o::CellIndex> for CellId {
    fn from(cell: h3o::CellIndex) -> Self {
        Self(cell.to_string())
    }
}

/// Set of cells a remote model marks as predicted presence
pub type PredictionCellSet = BTreeSet<CellId>;

/// A (latitude, longitude) pair in degrees
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<h3o::LatLng> for GeoPoint {
    fn from(ll: h3o::LatLng) -> Self {
        Self {
            lat: ll.lat(),
            lng: ll.lng(),
        }
    }
}

/// Closed polygon of one cell, derived on demand and never stored
pub type CellBoundary = Vec<GeoPoint>;

/// Bounding polygon of a prediction region, display-only
pub type ConvexHull = Vec<GeoPoint>;
