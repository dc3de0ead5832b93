//! Constraint profile routes for the calling user.

use super::{ApiError, ApiJson, AppState, user_id};
use crate::{
    core::constraints::{
        ApplianceFlags, ConstraintUpdate, delete_constraints, flags_of, get_constraints,
        upsert_constraints,
    },
    entities::constraint_profile,
    errors::Error,
};
use axum::{
    Json, Router,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

/// Constraint profile as returned to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintView {
    pub max_cook_time: i32,
    pub skill_level: String,
    pub appliances: ApplianceFlags,
    pub cooking_days: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<constraint_profile::Model> for ConstraintView {
    fn from(model: constraint_profile::Model) -> Self {
        Self {
            appliances: flags_of(&model),
            max_cook_time: model.max_cook_time,
            skill_level: model.skill_level,
            cooking_days: model.cooking_days.0,
            updated_at: model.updated_at,
        }
    }
}

/// Constraint routes
pub struct ConstraintRoutes;

impl ConstraintRoutes {
    pub fn routes(state: Arc<AppState>) -> Router {
        Router::new()
            .route(
                "/constraints",
                get(Self::handle_get)
                    .put(Self::handle_put)
                    .delete(Self::handle_delete),
            )
            .with_state(state)
    }

    async fn handle_get(
        State(state): State<Arc<AppState>>,
        headers: HeaderMap,
    ) -> Result<Response, ApiError> {
        let user = user_id(&headers)?;
        let profile = get_constraints(&state.db, &user)
            .await?
            .ok_or(Error::ConstraintsNotFound)?;
        Ok(Json(ConstraintView::from(profile)).into_response())
    }

    async fn handle_put(
        State(state): State<Arc<AppState>>,
        headers: HeaderMap,
        ApiJson(update): ApiJson<ConstraintUpdate>,
    ) -> Result<Response, ApiError> {
        let user = user_id(&headers)?;
        let saved = upsert_constraints(&state.db, &user, &update).await?;
        Ok(Json(ConstraintView::from(saved)).into_response())
    }

    async fn handle_delete(
        State(state): State<Arc<AppState>>,
        headers: HeaderMap,
    ) -> Result<Response, ApiError> {
        let user = user_id(&headers)?;
        if !delete_constraints(&state.db, &user).await? {
            return Err(Error::ConstraintsNotFound.into());
        }
        Ok(Json(json!({ "message": "Constraints deleted" })).into_response())
    }
}
