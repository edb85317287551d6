use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use tracing::debug;

use super::WorkQualityService;
use crate::graph::{GraphQuery, GraphSummary};
use crate::scoring::{EntryScore, NarrativeEntry};
use crate::talent::{TalentRequest, TalentResponse};

/// Router exposing CKP scoring plus the talent and graph lookups.
pub fn scoring_router(service: Arc<WorkQualityService>) -> Router {
    Router::new()
        .route("/nlp/score-ckp", post(score_ckp_handler))
        .route("/ml/talent-score", post(talent_score_handler))
        .route("/graph/summary", post(graph_summary_handler))
        .with_state(service)
}

pub(crate) async fn score_ckp_handler(
    State(service): State<Arc<WorkQualityService>>,
    Json(entries): Json<Vec<NarrativeEntry>>,
) -> Json<Vec<EntryScore>> {
    let scores = service.score_ckp(&entries);
    debug!(
        entries = scores.len(),
        scorer = service.mode().label(),
        "scored CKP batch"
    );
    Json(scores)
}

pub(crate) async fn talent_score_handler(
    State(service): State<Arc<WorkQualityService>>,
    Json(request): Json<TalentRequest>,
) -> Json<TalentResponse> {
    Json(service.talent_score(&request))
}

pub(crate) async fn graph_summary_handler(
    State(service): State<Arc<WorkQualityService>>,
    Json(query): Json<GraphQuery>,
) -> Json<GraphSummary> {
    Json(service.graph_summary(&query.pegawai_id))
}
