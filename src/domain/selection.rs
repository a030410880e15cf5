//! Annotation layers and map selections

use serde::{Deserialize, Serialize};

use super::cell::{CellId, GeoPoint};

/// The two mutually exclusive annotation layers
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    #[default]
    Presence,
    Absence,
}

impl Layer {
    /// The opposite layer
    pub fn other(self) -> Self {
        match self {
            Layer::Presence => Layer::Absence,
            Layer::Absence => Layer::Presence,
        }
    }

    /// Layer name as used on the wire
    pub fn name(self) -> &'static str {
        match self {
            Layer::Presence => "presence",
            Layer::Absence => "absence",
        }
    }
}

/// Presence switch: on selects presence, off selects absence
impl From<bool> for Layer {
    fn from(is_presence: bool) -> Self {
        if is_presence {
            Layer::Presence
        } else {
            Layer::Absence
        }
    }
}

impl From<Layer> for bool {
    fn from(layer: Layer) -> Self {
        layer == Layer::Presence
    }
}

/// What a click or selection event on the map yields
#[derive(Clone, Debug, PartialEq)]
pub enum Selection {
    /// Clicked map position, resolved to the cell containing it
    Point(GeoPoint),
    /// A cell picked directly
    Cell(CellId),
}

impl Selection {
    /// Resolve this selection to a cell at the given grid resolution
    pub fn resolve(&self, resolution: h3o::Resolution) -> crate::Result<CellId> {
        match self {
            Selection::Point(point) => crate::grid::cell_at(*point, resolution),
            Selection::Cell(cell) => Ok(cell.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_switch_conversion() {
        assert_eq!(Layer::from(true), Layer::Presence);
        assert_eq!(Layer::from(false), Layer::Absence);
        assert!(bool::from(Layer::Presence));
        assert_eq!(Layer::Presence.other(), Layer::Absence);
        assert_eq!(Layer::Absence.other().other(), Layer::Absence);
    }

    #[test]
    fn test_layer_name_matches_wire_form() {
        for layer in [Layer::Presence, Layer::Absence] {
            assert_eq!(
                serde_json::to_value(layer).unwrap(),
                serde_json::Value::from(layer.name())
            );
        }
    }

    #[test]
    fn test_cell_selection_resolves_unchanged() {
        let cell = CellId::from("not-validated");
        let resolved = Selection::Cell(cell.clone())
            .resolve(h3o::Resolution::Five)
            .unwrap();
        assert_eq!(resolved, cell);
    }
}
