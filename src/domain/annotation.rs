//! Presence/absence annotation state
//!
//! Every operation is a pure transformation `AnnotationState -> AnnotationState`.
//! A cell is a member of at most one layer at any time.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::cell::CellId;
use super::selection::Layer;

/// Wire shape of an annotation payload, as sent and received by the backend
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationLayers {
    #[serde(default)]
    pub presence: Vec<CellId>,
    #[serde(default)]
    pub absence: Vec<CellId>,
}

/// The two disjoint annotation sets
///
/// Equality is set equality; insertion order is not kept.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AnnotationLayers")]
pub struct AnnotationState {
    presence: BTreeSet<CellId>,
    absence: BTreeSet<CellId>,
}

impl AnnotationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a state from two layer lists
    ///
    /// A cell listed in both layers is kept in presence only.
    pub fn from_layers(
        presence: impl IntoIterator<Item = CellId>,
        absence: impl IntoIterator<Item = CellId>,
    ) -> Self {
        let presence: BTreeSet<CellId> = presence.into_iter().collect();
        let mut absence: BTreeSet<CellId> = absence.into_iter().collect();
        let before = absence.len();
        absence.retain(|cell| !presence.contains(cell));
        if absence.len() != before {
            log::warn!(
                "Dropped {} cells listed in both presence and absence",
                before - absence.len()
            );
        }
        Self { presence, absence }
    }

    pub fn presence(&self) -> &BTreeSet<CellId> {
        &self.presence
    }

    pub fn absence(&self) -> &BTreeSet<CellId> {
        &self.absence
    }

    fn layer_mut(&mut self, layer: Layer) -> &mut BTreeSet<CellId> {
        match layer {
            Layer::Presence => &mut self.presence,
            Layer::Absence => &mut self.absence,
        }
    }

    /// Which layer holds this cell, if any
    pub fn layer_of(&self, cell: &CellId) -> Option<Layer> {
        if self.presence.contains(cell) {
            Some(Layer::Presence)
        } else if self.absence.contains(cell) {
            Some(Layer::Absence)
        } else {
            None
        }
    }

    /// Total number of annotated cells
    pub fn len(&self) -> usize {
        self.presence.len() + self.absence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presence.is_empty() && self.absence.is_empty()
    }

    /// Flip one cell between "in `layer`" and "unannotated"
    ///
    /// A cell held by the other layer moves into `layer`; a single toggle
    /// never leaves the cell in the other layer.
    pub fn toggle(mut self, cell: CellId, layer: Layer) -> Self {
        if self.layer_mut(layer).remove(&cell) {
            return self;
        }
        self.layer_mut(layer.other()).remove(&cell);
        self.layer_mut(layer).insert(cell);
        self
    }

    /// Paint or erase a group of cells
    ///
    /// Additive writes take the cells out of both layers and put them in
    /// `layer`. Subtractive writes only erase from `layer`; cells held by the
    /// other layer stay where they are.
    pub fn bulk_apply(
        mut self,
        cells: impl IntoIterator<Item = CellId>,
        additive: bool,
        layer: Layer,
    ) -> Self {
        if additive {
            for cell in cells {
                self.layer_mut(layer.other()).remove(&cell);
                self.layer_mut(layer).insert(cell);
            }
        } else {
            let target = self.layer_mut(layer);
            for cell in cells {
                target.remove(&cell);
            }
        }
        self
    }

    /// Reset both layers to empty
    pub fn clear(self) -> Self {
        Self::default()
    }

    /// Wholesale replacement, used after a successful load
    pub fn replace_all(self, new_state: AnnotationState) -> Self {
        new_state
    }

    /// Apply one store message
    pub fn apply(self, msg: AnnotationMsg) -> Self {
        match msg {
            AnnotationMsg::Toggle(cell, layer) => self.toggle(cell, layer),
            AnnotationMsg::BulkApply {
                cells,
                additive,
                layer,
            } => self.bulk_apply(cells, additive, layer),
            AnnotationMsg::Clear => self.clear(),
            AnnotationMsg::ReplaceAll(state) => self.replace_all(state),
        }
    }

    /// Wire representation, layers in sorted order
    pub fn to_layers(&self) -> AnnotationLayers {
        AnnotationLayers {
            presence: self.presence.iter().cloned().collect(),
            absence: self.absence.iter().cloned().collect(),
        }
    }
}

impl From<AnnotationLayers> for AnnotationState {
    fn from(layers: AnnotationLayers) -> Self {
        Self::from_layers(layers.presence, layers.absence)
    }
}

/// Store operations, dispatched by hosts as messages
#[derive(Clone, Debug, PartialEq)]
pub enum AnnotationMsg {
    /// Flip a single cell in a layer
    Toggle(CellId, Layer),
    /// Multi-select paint (additive) or erase (subtractive)
    BulkApply {
        cells: Vec<CellId>,
        additive: bool,
        layer: Layer,
    },
    /// Empty both layers
    Clear,
    /// Replace the whole state
    ReplaceAll(AnnotationState),
}
