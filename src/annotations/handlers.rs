//! Annotation message handlers
//!
//! Routes store messages and map selections into the session state.

use crate::domain::{AnnotationMsg, CellId, Selection};
use crate::session::state::SessionState;

/// Handle an AnnotationMsg, replacing the session's annotation state
pub fn handle_annotation_msg(state: &mut SessionState, msg: AnnotationMsg) {
    log::debug!("Annotation message: {}", msg_name(&msg));
    let current = std::mem::take(&mut state.annotations);
    state.annotations = current.apply(msg);
}

/// Toggle the selected cell in the active layer
///
/// Returns the toggled cell, or `None` when the selection could not be
/// placed on the grid.
pub fn handle_selection(state: &mut SessionState, selection: &Selection) -> Option<CellId> {
    let cell = match selection.resolve(state.resolution) {
        Ok(cell) => cell,
        Err(err) => {
            log::warn!("Ignoring selection {:?}: {}", selection, err);
            return None;
        }
    };
    let layer = state.active_layer;
    log::debug!("Selected {} for the {} layer", cell, layer.name());
    handle_annotation_msg(state, AnnotationMsg::Toggle(cell.clone(), layer));
    Some(cell)
}

/// Paint or erase a multi-selection in the active layer
pub fn handle_multi_select(state: &mut SessionState, cells: Vec<CellId>) {
    let msg = AnnotationMsg::BulkApply {
        cells,
        additive: state.multi_select_additive,
        layer: state.active_layer,
    };
    handle_annotation_msg(state, msg);
}

fn msg_name(msg: &AnnotationMsg) -> &'static str {
    match msg {
        AnnotationMsg::Toggle(..) => "toggle",
        AnnotationMsg::BulkApply { additive: true, .. } => "bulk add",
        AnnotationMsg::BulkApply { additive: false, .. } => "bulk remove",
        AnnotationMsg::Clear => "clear",
        AnnotationMsg::ReplaceAll(_) => "replace all",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GeoPoint, Layer};
    use crate::grid;

    #[test]
    fn test_selection_toggles_active_layer() {
        let mut state = SessionState::default();
        state.active_layer = Layer::Absence;
        let cell = handle_selection(&mut state, &Selection::Point(GeoPoint::new(45.0, 5.0))).unwrap();
        assert_eq!(
            cell,
            grid::cell_at(GeoPoint::new(45.0, 5.0), grid::ANNOTATION_RESOLUTION).unwrap()
        );
        assert_eq!(state.annotations.layer_of(&cell), Some(Layer::Absence));

        handle_selection(&mut state, &Selection::Cell(cell.clone()));
        assert!(state.annotations.is_empty());
    }

    #[test]
    fn test_invalid_point_is_ignored() {
        let mut state = SessionState::default();
        let point = Selection::Point(GeoPoint::new(f64::INFINITY, 0.0));
        assert_eq!(handle_selection(&mut state, &point), None);
        assert!(state.annotations.is_empty());
    }

    #[test]
    fn test_multi_select_uses_mode_and_layer() {
        let mut state = SessionState::default();
        let cells = vec![CellId::from("A"), CellId::from("B")];
        handle_multi_select(&mut state, cells);
        assert_eq!(state.annotations.presence().len(), 2);

        state.multi_select_additive = false;
        handle_multi_select(&mut state, vec![CellId::from("A")]);
        assert_eq!(
            state.annotations.presence().iter().collect::<Vec<_>>(),
            vec![&CellId::from("B")]
        );
    }
}
