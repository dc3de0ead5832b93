//! HTTP API - thin axum handlers over `core`.
//!
//! Authentication happens upstream; the gateway forwards the caller's id in the
//! `x-user-id` header. Requests without it are rejected with 401.

pub mod constraints;
pub mod error;
pub mod meal_plans;
pub mod recommendations;

use crate::{
    config::settings::StoreConfig,
    core::ranking::MealRanker,
    errors::Error,
};
use axum::{Json, Router, extract::FromRequest, http::HeaderMap, routing::get};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Header carrying the authenticated user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Shared handler state.
pub struct AppState {
    pub db: DatabaseConnection,
    pub ranker: Arc<dyn MealRanker>,
    pub stores: Vec<StoreConfig>,
}

/// JSON body extractor that rejects with the API error body.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Reads the caller's id from the request headers.
pub(crate) fn user_id(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
        .ok_or(ApiError::Unauthorized)
}

/// Plan ids that are not integers cannot name any plan.
pub(crate) fn plan_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::from(Error::PlanNotFound { id: raw.to_string() }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Builds the full application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(recommendations::RecommendationRoutes::routes(Arc::clone(&state)))
        .merge(meal_plans::MealPlanRoutes::routes(Arc::clone(&state)))
        .merge(constraints::ConstraintRoutes::routes(state))
        .layer(TraceLayer::new_for_http())
}
