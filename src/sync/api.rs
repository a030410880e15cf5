//! Request/response types of the prediction backend and the backend trait

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::domain::{AnnotationLayers, AnnotationState, CellId, ConvexHull, GeoPoint};

/// Default model threshold used by the sidebar form
pub const DEFAULT_THRESHOLD: f64 = 0.08;

/// Parameters for one prediction run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub taxa_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxa_name: Option<String>,
    pub model: String,
    pub threshold: f64,
    pub hexagon_resolution: u8,
}

/// Annotation snapshot to persist for a taxon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveAnnotationRequest {
    pub taxa_id: String,
    pub annotation_hexagon_ids: AnnotationLayers,
}

impl SaveAnnotationRequest {
    pub fn new(taxa_id: impl Into<String>, state: &AnnotationState) -> Self {
        Self {
            taxa_id: taxa_id.into(),
            annotation_hexagon_ids: state.to_layers(),
        }
    }
}

/// Most recent saved annotation for a taxon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadAnnotationRequest {
    pub taxa_id: String,
}

/// Prediction result; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PredictionResponse {
    #[serde(default)]
    pub prediction_hexagon_ids: Option<Vec<CellId>>,
    #[serde(default)]
    pub annotation_hexagon_ids: Option<AnnotationState>,
    /// (lat, lng) pairs of the prediction region's convex hull
    #[serde(default)]
    pub hull_points: Option<Vec<[f64; 2]>>,
}

impl PredictionResponse {
    pub fn convex_hull(&self) -> Option<ConvexHull> {
        self.hull_points
            .as_ref()
            .map(|points| points.iter().map(|[lat, lng]| GeoPoint::new(*lat, *lng)).collect())
    }
}

/// Load result; the annotation set is absent when nothing was saved yet
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LoadAnnotationResponse {
    #[serde(default)]
    pub annotation_hexagon_ids: Option<AnnotationState>,
}

/// Acknowledgement of a save
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SaveAnnotationResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Remote prediction/annotation service
///
/// Business-level failures come back as [`crate::Error::Domain`],
/// everything that went wrong on the way as [`crate::Error::Transport`].
pub trait AnnotationBackend {
    fn generate_prediction(
        &self,
        request: &PredictionRequest,
    ) -> impl Future<Output = Result<PredictionResponse>>;

    fn save_annotation(
        &self,
        request: &SaveAnnotationRequest,
    ) -> impl Future<Output = Result<SaveAnnotationResponse>>;

    fn load_annotation(
        &self,
        request: &LoadAnnotationRequest,
    ) -> impl Future<Output = Result<LoadAnnotationResponse>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_response_optional_fields() {
        let resp: PredictionResponse =
            serde_json::from_str(r#"{"prediction_hexagon_ids":["X","Y"]}"#).unwrap();
        assert_eq!(
            resp.prediction_hexagon_ids,
            Some(vec![CellId::from("X"), CellId::from("Y")])
        );
        assert_eq!(resp.annotation_hexagon_ids, None);
        assert_eq!(resp.convex_hull(), None);
    }

    #[test]
    fn test_prediction_response_hull() {
        let resp: PredictionResponse =
            serde_json::from_str(r#"{"hull_points":[[1.0,2.0],[3.0,4.0]]}"#).unwrap();
        assert_eq!(
            resp.convex_hull().unwrap(),
            vec![GeoPoint::new(1.0, 2.0), GeoPoint::new(3.0, 4.0)]
        );
    }

    #[test]
    fn test_load_response_with_annotation() {
        let resp: LoadAnnotationResponse = serde_json::from_str(
            r#"{"annotation_hexagon_ids":{"presence":["A"],"absence":["B"]}}"#,
        )
        .unwrap();
        let state = resp.annotation_hexagon_ids.unwrap();
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn test_save_request_wire_shape() {
        let state = AnnotationState::new().toggle(CellId::from("A"), crate::domain::Layer::Absence);
        let json = serde_json::to_value(SaveAnnotationRequest::new("42", &state)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "taxa_id": "42",
                "annotation_hexagon_ids": {"presence": [], "absence": ["A"]}
            })
        );
    }
}
