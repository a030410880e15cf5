//! Viewport grid controller
//!
//! Republishes the set of grid cells covering the map whenever the user
//! finishes a pan or a zoom. Intermediate move/zoom frames are ignored so
//! the covering set is recomputed at most once per gesture.

use futures::{Stream, StreamExt};
use h3o::Resolution;
use tokio::sync::watch;

use crate::domain::{CellId, Viewport};
use crate::grid;

/// Zoom levels at or below this show no grid
pub const DEFAULT_MIN_GRID_ZOOM: u8 = 7;

/// Kind of map viewport event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportEventKind {
    /// Intermediate pan frame
    Move,
    /// Pan finished
    MoveEnd,
    /// Intermediate zoom frame
    Zoom,
    /// Zoom finished
    ZoomEnd,
}

impl ViewportEventKind {
    /// Whether this event ends a gesture
    pub fn is_settled(self) -> bool {
        matches!(self, ViewportEventKind::MoveEnd | ViewportEventKind::ZoomEnd)
    }
}

/// A viewport change reported by the host map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportEvent {
    pub kind: ViewportEventKind,
    pub viewport: Viewport,
}

impl ViewportEvent {
    pub fn move_end(viewport: Viewport) -> Self {
        Self {
            kind: ViewportEventKind::MoveEnd,
            viewport,
        }
    }

    pub fn zoom_end(viewport: Viewport) -> Self {
        Self {
            kind: ViewportEventKind::ZoomEnd,
            viewport,
        }
    }
}

/// Whether the grid is currently shown
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridState {
    /// Zoomed out at or below the threshold, nothing published
    #[default]
    Collapsed,
    /// Zoomed in, covering set published
    Expanded,
}

/// Derives the displayed grid cells from viewport changes
#[derive(Debug, Clone)]
pub struct ViewportGridController {
    resolution: Resolution,
    min_zoom: u8,
    state: GridState,
    cells: Vec<CellId>,
}

impl ViewportGridController {
    pub fn new(resolution: Resolution, min_zoom: u8) -> Self {
        Self {
            resolution,
            min_zoom,
            state: GridState::Collapsed,
            cells: Vec::new(),
        }
    }

    pub fn state(&self) -> GridState {
        self.state
    }

    /// Currently published cell set
    pub fn cells(&self) -> &[CellId] {
        &self.cells
    }

    /// Handle one viewport event
    ///
    /// Returns the republished cell set, or `None` when the event was an
    /// intermediate frame and nothing changed.
    pub fn handle_event(&mut self, event: &ViewportEvent) -> Option<&[CellId]> {
        if !event.kind.is_settled() {
            return None;
        }

        if event.viewport.zoom <= f64::from(self.min_zoom) {
            self.state = GridState::Collapsed;
            self.cells.clear();
            return Some(self.cells.as_slice());
        }

        self.state = GridState::Expanded;
        match grid::cells_covering_viewport(&event.viewport, self.resolution) {
            Ok(cells) => {
                log::debug!(
                    "Viewport at zoom {} covered by {} cells",
                    event.viewport.zoom,
                    cells.len()
                );
                self.cells = cells;
            }
            Err(err) => {
                log::warn!("Could not cover viewport {:?}: {}", event.viewport, err);
                self.cells.clear();
            }
        }
        Some(self.cells.as_slice())
    }

    /// Drive the controller from a host event stream until it ends
    ///
    /// Each settled event publishes the new cell set on `publish`. The loop
    /// stops early when every receiver has been dropped.
    pub async fn run<S>(mut self, events: S, publish: watch::Sender<Vec<CellId>>)
    where
        S: Stream<Item = ViewportEvent>,
    {
        let mut events = std::pin::pin!(events);
        while let Some(event) = events.next().await {
            if let Some(cells) = self.handle_event(&event) {
                if publish.send(cells.to_vec()).is_err() {
                    log::debug!("Grid subscribers gone, stopping viewport controller");
                    break;
                }
            }
        }
    }
}

impl Default for ViewportGridController {
    fn default() -> Self {
        Self::new(grid::ANNOTATION_RESOLUTION, DEFAULT_MIN_GRID_ZOOM)
    }
}
