//! Plan generation pipeline.
//!
//! candidates -> constraint filter -> ranking (best-effort) -> 7x4 assignment -> persist ->
//! history. The catalog query and the constraint lookup run concurrently.

use crate::{
    core::{
        candidates::select_candidates,
        constraints::{apply_constraints, load_constraints},
        plan::{NutritionSummary, record_plan_history, save_meal_plan, summarize_nutrition, week_start},
        profile::{Preferences, UserProfile},
        ranking::{MealRanker, rank_or_fallback},
        schedule::{DayAssignment, SLOTS_PER_WEEK, build_weekly_plan, meal_for_slot},
    },
    entities::meal_plan,
    errors::Result,
};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::{info, instrument};

/// A freshly generated and stored plan.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPlan {
    #[serde(flatten)]
    pub plan: meal_plan::Model,
    pub days: Vec<DayAssignment>,
    pub nutrition: NutritionSummary,
}

/// Generates, stores and records a weekly plan for `user_id`.
///
/// # Errors
/// `Error::NoCandidates` when the catalog query is empty, `Error::NoFeasibleMeals` when every
/// candidate violates the user's cooking constraints, or a database error. Ranking failures
/// never surface here.
#[instrument(skip(db, ranker, profile, preferences))]
pub async fn generate_meal_plan(
    db: &DatabaseConnection,
    ranker: &dyn MealRanker,
    user_id: &str,
    profile: &UserProfile,
    preferences: &Preferences,
) -> Result<GeneratedPlan> {
    let (candidates, constraints) = tokio::try_join!(
        select_candidates(db, profile, preferences),
        load_constraints(db, user_id),
    )?;

    let feasible = apply_constraints(candidates, &constraints)?;
    let ranked = rank_or_fallback(ranker, feasible, profile, preferences).await;
    let days = build_weekly_plan(&ranked)?;

    let assigned: Vec<_> = (0..SLOTS_PER_WEEK)
        .filter_map(|slot| meal_for_slot(&ranked, slot))
        .collect();
    let nutrition = summarize_nutrition(&assigned);

    let plan = save_meal_plan(
        db,
        user_id,
        week_start(Utc::now().date_naive()),
        &days,
        &nutrition,
    )
    .await?;
    record_plan_history(db, user_id, plan.id).await;

    info!(
        "Generated plan {} for {} from {} ranked meals",
        plan.id,
        user_id,
        ranked.len()
    );
    Ok(GeneratedPlan {
        plan,
        days,
        nutrition,
    })
}
