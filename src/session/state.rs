use std::sync::{Mutex, MutexGuard};

use h3o::Resolution;

use crate::annotations::handlers;
use crate::domain::{
    AnnotationMsg, AnnotationState, CellId, ConvexHull, Layer, PredictionCellSet, Selection,
};
use crate::grid;
use crate::sync::Host;

/// Everything one annotation session shows on the map
#[derive(Clone, Debug)]
pub struct SessionState {
    pub annotations: AnnotationState,
    /// `None` until the first prediction or load
    pub prediction_cells: Option<PredictionCellSet>,
    pub convex_hull: Option<ConvexHull>,
    /// Layer that clicks and multi-selections write to
    pub active_layer: Layer,
    /// Whether multi-selections paint (true) or erase (false)
    pub multi_select_additive: bool,
    pub resolution: Resolution,
    /// Number of operations currently holding the loading indicator
    pub loading: u32,
    pub last_notice: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            annotations: AnnotationState::default(),
            prediction_cells: None,
            convex_hull: None,
            active_layer: Layer::Presence,
            multi_select_additive: true,
            resolution: grid::ANNOTATION_RESOLUTION,
            loading: 0,
            last_notice: None,
        }
    }
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        self.loading > 0
    }
}

/// Reference host: session state behind a lock
///
/// Implements [`Host`] so the sync layer can drive it directly.
#[derive(Debug, Default)]
pub struct Session {
    state: Mutex<SessionState>,
}

impl Session {
    pub fn new(resolution: Resolution) -> Self {
        Self {
            state: Mutex::new(SessionState {
                resolution,
                ..SessionState::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        // Updates always swap in a fully built state
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> SessionState {
        self.lock().clone()
    }

    pub fn annotations(&self) -> AnnotationState {
        self.lock().annotations.clone()
    }

    pub fn set_active_layer(&self, layer: Layer) {
        self.lock().active_layer = layer;
    }

    pub fn set_multi_select_additive(&self, additive: bool) {
        self.lock().multi_select_additive = additive;
    }

    /// Toggle the clicked cell in the active layer
    pub fn click(&self, selection: &Selection) -> Option<CellId> {
        handlers::handle_selection(&mut self.lock(), selection)
    }

    /// Paint or erase a group of cells in the active layer
    pub fn multi_select(&self, cells: Vec<CellId>) {
        handlers::handle_multi_select(&mut self.lock(), cells);
    }
}

impl Host for Session {
    fn open_loading(&self) {
        self.lock().loading += 1;
    }

    fn close_loading(&self) {
        let mut state = self.lock();
        state.loading = state.loading.saturating_sub(1);
    }

    fn update_annotations(&self, msg: AnnotationMsg) {
        handlers::handle_annotation_msg(&mut self.lock(), msg);
    }

    fn set_prediction_cells(&self, cells: PredictionCellSet) {
        self.lock().prediction_cells = Some(cells);
    }

    fn set_convex_hull(&self, hull: ConvexHull) {
        self.lock().convex_hull = Some(hull);
    }

    fn notify_failure(&self, notice: &str) {
        self.lock().last_notice = Some(notice.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_depth_counts_overlapping_operations() {
        let session = Session::default();
        session.open_loading();
        session.open_loading();
        assert!(session.snapshot().is_loading());
        session.close_loading();
        assert!(session.snapshot().is_loading());
        session.close_loading();
        session.close_loading();
        assert_eq!(session.snapshot().loading, 0);
    }

    #[test]
    fn test_click_and_layer_switch() {
        let session = Session::default();
        let cell = CellId::from("852a1073fffffff");
        session.click(&Selection::Cell(cell.clone()));
        assert_eq!(session.annotations().layer_of(&cell), Some(Layer::Presence));

        session.set_active_layer(Layer::Absence);
        session.click(&Selection::Cell(cell.clone()));
        assert_eq!(session.annotations().layer_of(&cell), Some(Layer::Absence));
    }

    #[test]
    fn test_host_updates() {
        let session = Session::default();
        session.set_prediction_cells([CellId::from("X")].into());
        session.update_annotations(AnnotationMsg::Toggle(CellId::from("A"), Layer::Presence));
        session.notify_failure("boom");

        let state = session.snapshot();
        assert_eq!(state.prediction_cells.map(|c| c.len()), Some(1));
        assert_eq!(state.annotations.len(), 1);
        assert_eq!(state.last_notice.as_deref(), Some("boom"));
    }

    #[test]
    fn test_multi_select_erase_mode() {
        let session = Session::default();
        session.multi_select(vec![CellId::from("A"), CellId::from("B")]);
        session.set_multi_select_additive(false);
        session.multi_select(vec![CellId::from("B")]);
        assert_eq!(session.annotations().len(), 1);
    }
}
