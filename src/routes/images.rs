use axum::{extract::State, Extension, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    middleware::RequestId,
    routes::AppState,
    services::images::{collect_keyword_images, FOOD_KEYWORDS, IMAGES_PER_KEYWORD},
};

#[derive(Debug, Serialize)]
pub struct ImagesResponse {
    pub images: Vec<String>,
}

/// Handler for the food image proxy
///
/// Always answers 200; keywords whose upstream search fails are missing
/// from the list.
pub async fn food_images(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
) -> Json<ImagesResponse> {
    tracing::info!(request_id = %request_id, keywords = FOOD_KEYWORDS.len(), "Fetching food images");

    let images =
        collect_keyword_images(state.image_search.as_ref(), &FOOD_KEYWORDS, IMAGES_PER_KEYWORD)
            .await;

    Json(ImagesResponse { images })
}
