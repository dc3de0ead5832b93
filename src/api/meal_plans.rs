//! Stored plan routes: read, soft delete, and everything derived from the grocery list.
//!
//! Every route resolves the plan through the ownership check, so a plan belonging to someone
//! else answers 404 exactly like a missing one.

use super::{ApiError, ApiJson, AppState, plan_id, user_id};
use crate::core::{
    economics::{budget_alternatives, estimate_cost, missing_items},
    grocery::{build_grocery_list, mark_purchased, store_suggestions, summarize},
    plan::{get_owned_plan, get_plan_with_slots, soft_delete_plan},
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Body of `POST /meal-plans/:id/missing-items`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PantryRequest {
    pub pantry_items: Vec<String>,
}

/// Body of `POST /meal-plans/:id/mark-purchased`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PurchaseRequest {
    pub items: Vec<String>,
}

/// Meal plan routes
pub struct MealPlanRoutes;

impl MealPlanRoutes {
    pub fn routes(state: Arc<AppState>) -> Router {
        Router::new()
            .route(
                "/meal-plans/:id",
                get(Self::handle_get_plan).delete(Self::handle_delete_plan),
            )
            .route("/meal-plans/:id/grocery-list", get(Self::handle_grocery_list))
            .route("/meal-plans/:id/cost-estimate", get(Self::handle_cost_estimate))
            .route("/meal-plans/:id/missing-items", post(Self::handle_missing_items))
            .route(
                "/meal-plans/:id/budget-alternatives",
                get(Self::handle_budget_alternatives),
            )
            .route("/meal-plans/:id/grocery-summary", get(Self::handle_grocery_summary))
            .route("/meal-plans/:id/mark-purchased", post(Self::handle_mark_purchased))
            .route(
                "/meal-plans/:id/store-suggestions",
                get(Self::handle_store_suggestions),
            )
            .with_state(state)
    }

    async fn handle_get_plan(
        State(state): State<Arc<AppState>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, ApiError> {
        let user = user_id(&headers)?;
        let plan = get_plan_with_slots(&state.db, plan_id(&id)?, &user).await?;
        Ok(Json(plan).into_response())
    }

    async fn handle_delete_plan(
        State(state): State<Arc<AppState>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, ApiError> {
        let user = user_id(&headers)?;
        soft_delete_plan(&state.db, plan_id(&id)?, &user).await?;
        Ok(Json(json!({ "message": "Meal plan deleted" })).into_response())
    }

    async fn handle_grocery_list(
        State(state): State<Arc<AppState>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, ApiError> {
        let user = user_id(&headers)?;
        let list = build_grocery_list(&state.db, plan_id(&id)?, &user).await?;
        Ok(Json(list).into_response())
    }

    async fn handle_cost_estimate(
        State(state): State<Arc<AppState>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, ApiError> {
        let user = user_id(&headers)?;
        let list = build_grocery_list(&state.db, plan_id(&id)?, &user).await?;
        Ok(Json(estimate_cost(&list)).into_response())
    }

    async fn handle_missing_items(
        State(state): State<Arc<AppState>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        ApiJson(request): ApiJson<PantryRequest>,
    ) -> Result<Response, ApiError> {
        let user = user_id(&headers)?;
        let list = build_grocery_list(&state.db, plan_id(&id)?, &user).await?;
        Ok(Json(missing_items(&list, &request.pantry_items)).into_response())
    }

    async fn handle_budget_alternatives(
        State(state): State<Arc<AppState>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, ApiError> {
        let user = user_id(&headers)?;
        let list = build_grocery_list(&state.db, plan_id(&id)?, &user).await?;
        Ok(Json(budget_alternatives(&list)).into_response())
    }

    async fn handle_grocery_summary(
        State(state): State<Arc<AppState>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, ApiError> {
        let user = user_id(&headers)?;
        let list = build_grocery_list(&state.db, plan_id(&id)?, &user).await?;
        Ok(Json(summarize(&list)).into_response())
    }

    async fn handle_mark_purchased(
        State(state): State<Arc<AppState>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        ApiJson(request): ApiJson<PurchaseRequest>,
    ) -> Result<Response, ApiError> {
        let user = user_id(&headers)?;
        let list = build_grocery_list(&state.db, plan_id(&id)?, &user).await?;
        Ok(Json(mark_purchased(&list, &request.items)).into_response())
    }

    async fn handle_store_suggestions(
        State(state): State<Arc<AppState>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, ApiError> {
        let user = user_id(&headers)?;
        get_owned_plan(&state.db, plan_id(&id)?, &user).await?;
        Ok(Json(json!({ "stores": store_suggestions(&state.stores) })).into_response())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use crate::api::test_support::{send, test_app};
    use crate::test_utils::create_test_plan;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_plan_routes_for_owner() {
        let (app, state) = test_app().await;
        let plan = create_test_plan(&state.db, "owner").await.unwrap();
        let base = format!("/meal-plans/{}", plan.id);

        let (status, body) = send(&app, "GET", &base, Some("owner"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["days"].as_array().unwrap().len(), 7);

        let (status, list) =
            send(&app, "GET", &format!("{base}/grocery-list"), Some("owner"), None).await;
        assert_eq!(status, StatusCode::OK);
        // 28 cups of rice and 56 tomatoes.
        assert_eq!(list["totalItems"], 2);
        assert_eq!(list["totalCost"], 35.0 + 56.0);

        let (status, estimate) =
            send(&app, "GET", &format!("{base}/cost-estimate"), Some("owner"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(estimate["budgetLevel"], "medium");

        let (status, missing) = send(
            &app,
            "POST",
            &format!("{base}/missing-items"),
            Some("owner"),
            Some(json!({ "pantryItems": ["Rice "] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let missing = missing.as_array().unwrap();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0]["name"], "tomatoes");
        assert_eq!(missing[0]["priority"], "medium");

        let (status, alternatives) = send(
            &app,
            "GET",
            &format!("{base}/budget-alternatives"),
            Some("owner"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(alternatives.as_array().unwrap().len(), 2);

        let (status, summary) =
            send(&app, "GET", &format!("{base}/grocery-summary"), Some("owner"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(summary["categories"]["Pantry"], 1);

        let (status, receipt) = send(
            &app,
            "POST",
            &format!("{base}/mark-purchased"),
            Some("owner"),
            Some(json!({ "items": ["rice"] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(receipt["purchased"], json!(["rice"]));

        let (status, stores) = send(
            &app,
            "GET",
            &format!("{base}/store-suggestions"),
            Some("owner"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stores["stores"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_foreign_and_unknown_plans_are_not_found() {
        let (app, state) = test_app().await;
        let plan = create_test_plan(&state.db, "owner").await.unwrap();

        for path in ["", "/grocery-list", "/cost-estimate", "/budget-alternatives"] {
            let uri = format!("/meal-plans/{}{path}", plan.id);
            let (status, body) = send(&app, "GET", &uri, Some("intruder"), None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body["error"]["code"], "PLAN_NOT_FOUND");
        }

        let (status, _) = send(&app, "GET", "/meal-plans/not-a-number", Some("owner"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, "GET", "/meal-plans/99999", Some("owner"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_deleted_plan_disappears() {
        let (app, state) = test_app().await;
        let plan = create_test_plan(&state.db, "owner").await.unwrap();
        let uri = format!("/meal-plans/{}", plan.id);

        let (status, _) = send(&app, "DELETE", &uri, Some("intruder"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "DELETE", &uri, Some("owner"), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) =
            send(&app, "GET", &format!("{uri}/grocery-list"), Some("owner"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
