//! Plan generation and history routes.

use super::{ApiError, ApiJson, AppState, user_id};
use crate::core::{
    plan::list_plan_history,
    profile::{Preferences, UserProfile},
    recommend::generate_meal_plan,
};
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use std::sync::Arc;

/// Body of `POST /recommendations/generate`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GenerateRequest {
    pub profile: UserProfile,
    pub preferences: Preferences,
}

/// Recommendation routes
pub struct RecommendationRoutes;

impl RecommendationRoutes {
    pub fn routes(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/recommendations/generate", post(Self::handle_generate))
            .route("/recommendations/history", get(Self::handle_history))
            .with_state(state)
    }

    async fn handle_generate(
        State(state): State<Arc<AppState>>,
        headers: HeaderMap,
        ApiJson(request): ApiJson<GenerateRequest>,
    ) -> Result<Response, ApiError> {
        let user = user_id(&headers)?;
        let generated = generate_meal_plan(
            &state.db,
            state.ranker.as_ref(),
            &user,
            &request.profile,
            &request.preferences,
        )
        .await?;
        Ok((StatusCode::CREATED, Json(generated)).into_response())
    }

    async fn handle_history(
        State(state): State<Arc<AppState>>,
        headers: HeaderMap,
    ) -> Result<Response, ApiError> {
        let user = user_id(&headers)?;
        let plans = list_plan_history(&state.db, &user).await?;
        Ok(Json(plans).into_response())
    }
}
