use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::{make_span_with_request_id, request_id_middleware},
    models::Destination,
    services::{GroupStore, ImageSearch},
};

pub mod extract;
pub mod groups;
pub mod images;
pub mod recommendations;

/// Shared application state
pub struct AppState {
    /// Destination catalog loaded at startup
    pub destinations: Arc<[Destination]>,
    /// Image search backend for the `/images` proxy
    pub image_search: Arc<dyn ImageSearch>,
    /// Group trips, questionnaires and votes
    pub groups: GroupStore,
}

impl AppState {
    pub fn new(
        destinations: Vec<Destination>,
        image_search: Arc<dyn ImageSearch>,
        groups: GroupStore,
    ) -> Self {
        Self {
            destinations: destinations.into(),
            image_search,
            groups,
        }
    }
}

/// Creates the application router with all routes
///
/// CORS is wide open (any origin, method and header) for local frontend
/// development.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/recommend", post(recommendations::recommend))
        .route("/images", get(images::food_images))
        .nest("/api", group_routes())
        .with_state(Arc::new(state))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
}

/// Group trip planning: groups, members, questionnaires and voting rounds
fn group_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/groups", get(groups::list_groups).post(groups::create_group))
        .route("/groups/:group_id", get(groups::get_group).put(groups::rename_group))
        .route("/groups/:group_id/members", post(groups::add_member))
        .route(
            "/groups/:group_id/members/:member_id",
            patch(groups::update_member).delete(groups::delete_member),
        )
        .route(
            "/groups/:group_id/members/:member_id/questionnaire",
            get(groups::get_questionnaire).post(groups::save_questionnaire),
        )
        .route(
            "/groups/:group_id/rounds",
            get(groups::list_rounds).post(groups::start_round),
        )
        .route("/groups/:group_id/rounds/:round_id/votes", get(groups::list_votes))
        .route("/groups/:group_id/rounds/:round_id/vote", post(groups::cast_vote))
        .route("/groups/:group_id/rounds/:round_id/close", post(groups::close_round))
        .route("/users", get(groups::list_users))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
