use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    middleware::RequestId,
    models::RecommendationResponse,
    routes::{extract::AppJson, AppState},
    services::recommendations::{self, DEFAULT_TOP_N},
};

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub preferences: Vec<String>,
}

/// Handler for the recommendation endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    AppJson(request): AppJson<RecommendationRequest>,
) -> Json<Vec<RecommendationResponse>> {
    let recommendations =
        recommendations::recommend(&request.preferences, &state.destinations, DEFAULT_TOP_N);

    tracing::info!(
        request_id = %request_id,
        preferences = request.preferences.len(),
        returned = recommendations.len(),
        "Recommendations served"
    );

    Json(
        recommendations
            .into_iter()
            .map(RecommendationResponse::from)
            .collect(),
    )
}
