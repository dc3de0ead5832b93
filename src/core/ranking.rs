//! Ranking adapter - best-effort reordering of feasible meals by an external service.
//!
//! The ranking service is a soft dependency. [`rank_or_fallback`] never fails: a transport
//! error, non-2xx status, timeout, undecodable body, or a response that adds, drops or
//! duplicates meals all produce the input list unchanged, and the degradation is logged.

use crate::{
    core::profile::{Preferences, UserProfile},
    entities::meal,
    errors::{Error, Result},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error as ThisError;
use tracing::{debug, info, instrument, warn};

/// Why a ranking attempt produced no usable order.
#[derive(Debug, ThisError)]
pub enum RankingError {
    /// The request did not complete within the configured timeout.
    #[error("ranking request timed out")]
    Timeout,
    /// Connection or protocol failure.
    #[error("ranking transport error: {0}")]
    Transport(String),
    /// The service answered with a non-success status.
    #[error("ranking service returned status {0}")]
    Status(u16),
    /// The response body was not the expected shape.
    #[error("ranking response could not be decoded: {0}")]
    Decode(String),
    /// The returned ids were not exactly a reordering of the submitted meals.
    #[error("ranking response is not a permutation of the submitted meals")]
    NotAPermutation,
}

/// Payload sent to the ranking service.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingRequest<'a> {
    pub meals: &'a [meal::Model],
    pub user_profile: &'a UserProfile,
    pub preferences: &'a Preferences,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RankingResponse {
    ranked_meals: Vec<RankedMealRef>,
}

#[derive(Debug, Deserialize)]
struct RankedMealRef {
    #[serde(alias = "_id")]
    id: i64,
}

/// A service that proposes an order for a set of meals.
#[async_trait]
pub trait MealRanker: Send + Sync {
    /// Returns the meal ids of `request.meals` in ranked order.
    async fn rank(
        &self,
        request: &RankingRequest<'_>,
    ) -> std::result::Result<Vec<i64>, RankingError>;
}

/// Ranker used when no ranking service is configured; keeps the catalog order.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRanker;

#[async_trait]
impl MealRanker for NoopRanker {
    async fn rank(
        &self,
        request: &RankingRequest<'_>,
    ) -> std::result::Result<Vec<i64>, RankingError> {
        Ok(request.meals.iter().map(|m| m.id).collect())
    }
}

/// Ranker backed by the HTTP ranking service (`POST {base_url}/recommend`).
#[derive(Debug, Clone)]
pub struct HttpMealRanker {
    client: Client,
    endpoint: String,
}

impl HttpMealRanker {
    /// Creates a ranker for `base_url` whose requests are abandoned after `timeout`.
    ///
    /// # Errors
    /// Returns `Error::Config` if the HTTP client cannot be constructed.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config {
                message: format!("Failed to build ranking HTTP client: {e}"),
            })?;
        let endpoint = format!("{}/recommend", base_url.trim_end_matches('/'));
        info!(
            "Ranking service configured at {} (timeout {:?})",
            endpoint, timeout
        );
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl MealRanker for HttpMealRanker {
    #[instrument(skip_all, fields(endpoint = %self.endpoint, meals = request.meals.len()))]
    async fn rank(
        &self,
        request: &RankingRequest<'_>,
    ) -> std::result::Result<Vec<i64>, RankingError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RankingError::Status(status.as_u16()));
        }

        let body: RankingResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                RankingError::Timeout
            } else {
                RankingError::Decode(e.to_string())
            }
        })?;
        Ok(body.ranked_meals.into_iter().map(|r| r.id).collect())
    }
}

fn classify(error: reqwest::Error) -> RankingError {
    if error.is_timeout() {
        RankingError::Timeout
    } else {
        RankingError::Transport(error.to_string())
    }
}

/// Reorders `candidates` by `order`, which must name every candidate exactly once.
fn apply_order(
    candidates: &[meal::Model],
    order: &[i64],
) -> std::result::Result<Vec<meal::Model>, RankingError> {
    if order.len() != candidates.len() {
        return Err(RankingError::NotAPermutation);
    }
    let mut by_id: HashMap<i64, &meal::Model> = candidates.iter().map(|m| (m.id, m)).collect();
    order
        .iter()
        .map(|id| {
            by_id
                .remove(id)
                .cloned()
                .ok_or(RankingError::NotAPermutation)
        })
        .collect()
}

/// Asks `ranker` for an order and applies it, or returns `candidates` unchanged.
///
/// Never fails and never retries.
pub async fn rank_or_fallback(
    ranker: &dyn MealRanker,
    candidates: Vec<meal::Model>,
    profile: &UserProfile,
    preferences: &Preferences,
) -> Vec<meal::Model> {
    let request = RankingRequest {
        meals: &candidates,
        user_profile: profile,
        preferences,
    };

    let outcome = ranker
        .rank(&request)
        .await
        .and_then(|order| apply_order(&candidates, &order));

    match outcome {
        Ok(ranked) => {
            debug!("Applied ranking to {} meals", ranked.len());
            ranked
        }
        Err(e) => {
            warn!(error = %e, "Ranking service degraded, keeping filtered order");
            candidates
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{init_test_tracing, meal_model};
    use axum::{Json, Router, http::StatusCode, routing::post};
    use serde_json::{Value, json};

    fn meals() -> Vec<meal::Model> {
        (1..=4)
            .map(|id| meal_model(id, &format!("Meal {id}"), 10, "beginner", &[]))
            .collect()
    }

    fn ids(meals: &[meal::Model]) -> Vec<i64> {
        meals.iter().map(|m| m.id).collect()
    }

    async fn spawn_service(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn reverse_handler(Json(body): Json<Value>) -> Json<Value> {
        let mut ranked: Vec<Value> = body["meals"].as_array().cloned().unwrap_or_default();
        ranked.reverse();
        Json(json!({ "rankedMeals": ranked }))
    }

    struct FixedRanker(std::result::Result<Vec<i64>, ()>);

    #[async_trait]
    impl MealRanker for FixedRanker {
        async fn rank(
            &self,
            _request: &RankingRequest<'_>,
        ) -> std::result::Result<Vec<i64>, RankingError> {
            self.0.clone().map_err(|()| RankingError::Status(503))
        }
    }

    #[tokio::test]
    async fn test_fallback_preserves_input_order_on_error() {
        init_test_tracing();
        let input = meals();
        let ranked = rank_or_fallback(
            &FixedRanker(Err(())),
            input.clone(),
            &UserProfile::default(),
            &Preferences::default(),
        )
        .await;
        assert_eq!(ranked, input);
    }

    #[tokio::test]
    async fn test_ranking_cannot_add_or_drop_meals() {
        let input = meals();
        for order in [vec![4, 3, 2], vec![4, 3, 2, 1, 99], vec![1, 1, 2, 3], vec![9, 3, 2, 1]] {
            let ranked = rank_or_fallback(
                &FixedRanker(Ok(order)),
                input.clone(),
                &UserProfile::default(),
                &Preferences::default(),
            )
            .await;
            assert_eq!(ids(&ranked), vec![1, 2, 3, 4]);
        }
    }

    #[tokio::test]
    async fn test_valid_permutation_is_applied() {
        let ranked = rank_or_fallback(
            &FixedRanker(Ok(vec![3, 1, 4, 2])),
            meals(),
            &UserProfile::default(),
            &Preferences::default(),
        )
        .await;
        assert_eq!(ids(&ranked), vec![3, 1, 4, 2]);
    }

    #[tokio::test]
    async fn test_noop_ranker_keeps_order() {
        let ranked = rank_or_fallback(
            &NoopRanker,
            meals(),
            &UserProfile::default(),
            &Preferences::default(),
        )
        .await;
        assert_eq!(ids(&ranked), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_http_ranker_applies_service_order() {
        let url = spawn_service(Router::new().route("/recommend", post(reverse_handler))).await;
        let ranker = HttpMealRanker::new(&url, Duration::from_secs(5)).unwrap();

        let ranked = rank_or_fallback(
            &ranker,
            meals(),
            &UserProfile::default(),
            &Preferences::default(),
        )
        .await;
        assert_eq!(ids(&ranked), vec![4, 3, 2, 1]);
    }

    #[tokio::test]
    async fn test_http_ranker_error_status() {
        let url = spawn_service(Router::new().route(
            "/recommend",
            post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        ))
        .await;
        let ranker = HttpMealRanker::new(&url, Duration::from_secs(5)).unwrap();
        let input = meals();

        let request = RankingRequest {
            meals: &input,
            user_profile: &UserProfile::default(),
            preferences: &Preferences::default(),
        };
        assert!(matches!(
            ranker.rank(&request).await,
            Err(RankingError::Status(500))
        ));

        let ranked =
            rank_or_fallback(&ranker, input.clone(), &UserProfile::default(), &Preferences::default())
                .await;
        assert_eq!(ranked, input);
    }

    #[tokio::test]
    async fn test_http_ranker_timeout_falls_back() {
        let url = spawn_service(Router::new().route(
            "/recommend",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({ "rankedMeals": [] }))
            }),
        ))
        .await;
        let ranker = HttpMealRanker::new(&url, Duration::from_millis(100)).unwrap();
        let input = meals();

        let request = RankingRequest {
            meals: &input,
            user_profile: &UserProfile::default(),
            preferences: &Preferences::default(),
        };
        assert!(matches!(
            ranker.rank(&request).await,
            Err(RankingError::Timeout)
        ));

        let ranked =
            rank_or_fallback(&ranker, input.clone(), &UserProfile::default(), &Preferences::default())
                .await;
        assert_eq!(ranked, input);
    }

    #[tokio::test]
    async fn test_http_ranker_unreachable_falls_back() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let ranker = HttpMealRanker::new(&url, Duration::from_secs(2)).unwrap();
        let input = meals();
        let ranked =
            rank_or_fallback(&ranker, input.clone(), &UserProfile::default(), &Preferences::default())
                .await;
        assert_eq!(ranked, input);
    }

    #[tokio::test]
    async fn test_http_ranker_bad_body_falls_back() {
        let url = spawn_service(Router::new().route(
            "/recommend",
            post(|| async { Json(json!({ "unexpected": true })) }),
        ))
        .await;
        let ranker = HttpMealRanker::new(&url, Duration::from_secs(5)).unwrap();
        let input = meals();
        let request = RankingRequest {
            meals: &input,
            user_profile: &UserProfile::default(),
            preferences: &Preferences::default(),
        };
        assert!(matches!(
            ranker.rank(&request).await,
            Err(RankingError::Decode(_))
        ));
    }
}
