//! Geographic bounding boxes and map viewports

use super::cell::GeoPoint;

/// Axis-aligned geographic bounding box
///
/// No dateline correction is applied: a box with `west > east` is passed on
/// exactly as the map reported it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoundingBox {
    pub south_west: GeoPoint,
    pub north_east: GeoPoint,
}

impl BoundingBox {
    /// Create a new box from its southwest and northeast corners
    pub fn new(south_west: GeoPoint, north_east: GeoPoint) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Create a box from edge values
    pub fn from_edges(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self::new(GeoPoint::new(south, west), GeoPoint::new(north, east))
    }

    pub fn south(&self) -> f64 {
        self.south_west.lat
    }

    pub fn west(&self) -> f64 {
        self.south_west.lng
    }

    pub fn north(&self) -> f64 {
        self.north_east.lat
    }

    pub fn east(&self) -> f64 {
        self.north_east.lng
    }

    /// Closed four-corner ring: SW, NW, NE, SE, back to SW
    pub fn ring(&self) -> [GeoPoint; 5] {
        [
            GeoPoint::new(self.south(), self.west()),
            GeoPoint::new(self.north(), self.west()),
            GeoPoint::new(self.north(), self.east()),
            GeoPoint::new(self.south(), self.east()),
            GeoPoint::new(self.south(), self.west()),
        ]
    }

    pub(crate) fn validate(&self) -> crate::Result<()> {
        let edges = [self.south(), self.west(), self.north(), self.east()];
        if edges.iter().any(|v| !v.is_finite()) {
            return Err(crate::Error::InvalidViewport(format!(
                "non-finite bounds {edges:?}"
            )));
        }
        if self.south() > self.north() {
            return Err(crate::Error::InvalidViewport(format!(
                "south {} is above north {}",
                self.south(),
                self.north()
            )));
        }
        if self.south() < -90.0 || self.north() > 90.0 {
            return Err(crate::Error::InvalidViewport(format!(
                "latitude out of range [{}, {}]",
                self.south(),
                self.north()
            )));
        }
        Ok(())
    }
}

/// Visible map extent plus zoom level
///
/// Map zoom is continuous, so fractional levels are kept as reported.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub bounds: BoundingBox,
    pub zoom: f64,
}

impl Viewport {
    pub fn new(bounds: BoundingBox, zoom: f64) -> Self {
        Self { bounds, zoom }
    }
}
