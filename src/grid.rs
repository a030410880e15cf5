//! Grid index: viewport coverage and cell geometry on the H3 grid

use geo_types::{LineString, Polygon};
use h3o::geom::{ContainmentMode, TilerBuilder};
use h3o::{LatLng, Resolution};

use crate::domain::{BoundingBox, CellBoundary, CellId, GeoPoint, Viewport};
use crate::{Error, Result};

/// Grid density used for annotation and prediction cells
pub const ANNOTATION_RESOLUTION: Resolution = Resolution::Five;

/// Convert a configured resolution level into a grid resolution
pub fn resolution(level: u8) -> Result<Resolution> {
    Resolution::try_from(level)
        .map_err(|_| Error::InvalidViewport(format!("unsupported resolution {level}")))
}

/// Every cell whose hexagon intersects the viewport's bounding box
///
/// The box is handed to the grid library as a closed four-corner polygon,
/// without any dateline correction. Output is sorted.
pub fn cells_covering_viewport(viewport: &Viewport, resolution: Resolution) -> Result<Vec<CellId>> {
    cells_covering_box(&viewport.bounds, resolution)
}

/// Every cell whose hexagon intersects the bounding box
pub fn cells_covering_box(bounds: &BoundingBox, resolution: Resolution) -> Result<Vec<CellId>> {
    bounds.validate()?;

    // Polygon coordinates are (x = lng, y = lat)
    let exterior: LineString<f64> = bounds
        .ring()
        .iter()
        .map(|p| (p.lng, p.lat))
        .collect::<Vec<_>>()
        .into();
    let polygon = Polygon::new(exterior, Vec::new());

    let mut tiler = TilerBuilder::new(resolution)
        .containment_mode(ContainmentMode::IntersectsBoundary)
        .build();
    tiler
        .add(polygon)
        .map_err(|err| Error::InvalidViewport(err.to_string()))?;

    let mut cells: Vec<CellId> = tiler.into_coverage().map(CellId::from).collect();
    cells.sort();
    cells.dedup();
    Ok(cells)
}

/// Polygon vertices of one cell, as (lat, lng) points in the grid's
/// counter-clockwise order
pub fn boundary_of(cell: &CellId) -> Result<CellBoundary> {
    let index = cell.parse()?;
    Ok(index.boundary().iter().map(|ll| GeoPoint::from(*ll)).collect())
}

/// Boundaries of a sequence of cells, in input order
///
/// `None` means no data yet and maps to `None`; an empty slice maps to an
/// empty list.
pub fn boundaries_of(cells: Option<&[CellId]>) -> Result<Option<Vec<CellBoundary>>> {
    let Some(cells) = cells else {
        return Ok(None);
    };
    cells.iter().map(boundary_of).collect::<Result<Vec<_>>>().map(Some)
}

/// The cell containing a map position
pub fn cell_at(point: GeoPoint, resolution: Resolution) -> Result<CellId> {
    let ll = LatLng::new(point.lat, point.lng).map_err(|_| Error::InvalidCoordinate {
        lat: point.lat,
        lng: point.lng,
    })?;
    Ok(ll.to_cell(resolution).into())
}

/// Center point of a cell
pub fn center_of(cell: &CellId) -> Result<GeoPoint> {
    let index = cell.parse()?;
    Ok(LatLng::from(index).into())
}
