//! Prediction/annotation sync
//!
//! Orchestrates the remote generate/save/load operations and folds their
//! results into host state. Every operation:
//! - opens the host loading indicator before starting and closes it exactly
//!   once when it settles, whatever the outcome
//! - turns any failure into one logged diagnostic plus one generic notice
//! - never retries
//!
//! Overlapping calls are not serialized; whichever response resolves last
//! decides the final state.

pub mod api;
pub mod http;

pub use api::{
    AnnotationBackend, LoadAnnotationRequest, LoadAnnotationResponse, PredictionRequest,
    PredictionResponse, SaveAnnotationRequest, SaveAnnotationResponse,
};
pub use http::HttpBackend;

use crate::Error;
use crate::domain::{AnnotationMsg, ConvexHull, PredictionCellSet};

/// Notice shown when the backend reports a business-level failure
pub const DOMAIN_FAILURE_NOTICE: &str = "Operation failed. Please try again later.";
/// Notice shown for transport failures and anything unexpected
pub const UNEXPECTED_FAILURE_NOTICE: &str = "An unexpected error occurred.";

/// What the sync layer needs from the UI hosting it
pub trait Host {
    /// Engage the loading indicator
    fn open_loading(&self);
    /// Release the loading indicator
    fn close_loading(&self);
    /// Apply an annotation store message to the host's annotation state
    fn update_annotations(&self, msg: AnnotationMsg);
    /// Replace the prediction cell set wholesale
    fn set_prediction_cells(&self, cells: PredictionCellSet);
    /// Replace the prediction region hull
    fn set_convex_hull(&self, hull: ConvexHull);
    /// Show a user-facing failure notice
    fn notify_failure(&self, notice: &str);
}

/// Keeps the loading indicator open for its lifetime
pub struct LoadingGuard<'a, H: Host + ?Sized> {
    host: &'a H,
}

impl<'a, H: Host + ?Sized> LoadingGuard<'a, H> {
    pub fn open(host: &'a H) -> Self {
        host.open_loading();
        Self { host }
    }
}

impl<H: Host + ?Sized> Drop for LoadingGuard<'_, H> {
    fn drop(&mut self) {
        self.host.close_loading();
    }
}

/// How a sync operation settled
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Completed,
    Failed(Error),
}

impl Outcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed)
    }
}

/// Runs sync operations against one backend
#[derive(Debug, Clone)]
pub struct AnnotationSync<B> {
    backend: B,
}

impl<B: AnnotationBackend> AnnotationSync<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Request a prediction and apply whichever result sets came back
    pub async fn run_generate_prediction<H: Host + ?Sized>(
        &self,
        host: &H,
        request: &PredictionRequest,
    ) -> Outcome {
        let _loading = LoadingGuard::open(host);
        match self.backend.generate_prediction(request).await {
            Ok(response) => {
                if let Some(hull) = response.convex_hull() {
                    host.set_convex_hull(hull);
                }
                if let Some(cells) = response.prediction_hexagon_ids {
                    log::info!(
                        "Prediction for taxon {} returned {} cells",
                        request.taxa_id,
                        cells.len()
                    );
                    host.set_prediction_cells(cells.into_iter().collect());
                }
                if let Some(state) = response.annotation_hexagon_ids {
                    host.update_annotations(AnnotationMsg::ReplaceAll(state));
                }
                Outcome::Completed
            }
            Err(err) => report_failure(host, "generate prediction", err),
        }
    }

    /// Persist the given annotation snapshot
    ///
    /// Local state is never touched, so a failure needs no rollback.
    pub async fn run_save_annotation<H: Host + ?Sized>(
        &self,
        host: &H,
        request: &SaveAnnotationRequest,
    ) -> Outcome {
        let _loading = LoadingGuard::open(host);
        match self.backend.save_annotation(request).await {
            Ok(response) => {
                log::info!(
                    "Saved annotation for taxon {}{}",
                    request.taxa_id,
                    response
                        .message
                        .map(|m| format!(": {m}"))
                        .unwrap_or_default()
                );
                Outcome::Completed
            }
            Err(err) => report_failure(host, "save annotation", err),
        }
    }

    /// Fetch the latest saved annotation and replace local state with it
    pub async fn run_load_annotation<H: Host + ?Sized>(
        &self,
        host: &H,
        request: &LoadAnnotationRequest,
    ) -> Outcome {
        let _loading = LoadingGuard::open(host);
        match self.backend.load_annotation(request).await {
            Ok(response) => {
                match response.annotation_hexagon_ids {
                    Some(state) => {
                        log::info!(
                            "Loaded {} annotated cells for taxon {}",
                            state.len(),
                            request.taxa_id
                        );
                        host.update_annotations(AnnotationMsg::ReplaceAll(state));
                    }
                    None => log::info!("No saved annotation for taxon {}", request.taxa_id),
                }
                Outcome::Completed
            }
            Err(err) => report_failure(host, "load annotation", err),
        }
    }

    /// Clear local annotations; no network involved
    pub async fn run_clear_annotation<H: Host + ?Sized>(&self, host: &H) -> Outcome {
        let _loading = LoadingGuard::open(host);
        host.update_annotations(AnnotationMsg::Clear);
        Outcome::Completed
    }
}

fn report_failure<H: Host + ?Sized>(host: &H, operation: &str, err: Error) -> Outcome {
    log::error!("Error during {operation}: {err}");
    let notice = if err.is_domain() {
        DOMAIN_FAILURE_NOTICE
    } else {
        UNEXPECTED_FAILURE_NOTICE
    };
    host.notify_failure(notice);
    Outcome::Failed(err)
}
