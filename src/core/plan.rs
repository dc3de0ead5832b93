//! Plan persistence - writing generated plans and reading them back for their owner.
//!
//! A plan is one `meal_plans` row plus its 28 `plan_slots` rows, written in a single
//! transaction. History, activity and last-active bookkeeping happen afterwards and are
//! best-effort. Reads always go through [`get_owned_plan`] so soft-deleted and foreign plans
//! are indistinguishable from missing ones.

use crate::{
    core::{
        catalog::get_meals_by_ids,
        schedule::{DAYS_PER_WEEK, DayAssignment, MealType, Weekday, slot_position},
    },
    entities::{
        MealPlan, PlanHistory, PlanSlot, UserAccount, activity_log, meal, meal_plan,
        plan_history, plan_slot, user_account,
    },
    errors::{Error, Result},
};
use chrono::{Datelike, Days, NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::OnConflict};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, error, info, instrument};

/// Title given to generated plans.
pub const GENERATED_PLAN_TITLE: &str = "Weekly Meal Plan";
/// `generated_by` value for pipeline output.
pub const GENERATED_BY_AI: &str = "ai";
/// Activity action recorded when a plan is generated.
pub const GENERATE_ACTION: &str = "GENERATE_MEAL_PLAN";

/// Average per-day nutrition across a plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NutritionSummary {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Sums the nutrition of every assigned slot and divides by the number of days.
#[must_use]
pub fn summarize_nutrition(assigned: &[&meal::Model]) -> NutritionSummary {
    let days = DAYS_PER_WEEK as f64;
    let total = assigned.iter().fold(NutritionSummary::default(), |acc, m| {
        NutritionSummary {
            calories: acc.calories + m.calories,
            protein: acc.protein + m.protein,
            carbs: acc.carbs + m.carbs,
            fats: acc.fats + m.fats,
        }
    });
    NutritionSummary {
        calories: round1(total.calories / days),
        protein: round1(total.protein / days),
        carbs: round1(total.carbs / days),
        fats: round1(total.fats / days),
    }
}

/// Monday of the week containing `date`.
#[must_use]
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// Writes a plan row and its slots atomically.
///
/// # Errors
/// Returns `Error::InvalidInput` if `days` does not describe exactly 7 days of 4 slots.
#[instrument(skip(db, days, summary))]
pub async fn save_meal_plan(
    db: &DatabaseConnection,
    user_id: &str,
    week_start_date: NaiveDate,
    days: &[DayAssignment],
    summary: &NutritionSummary,
) -> Result<meal_plan::Model> {
    if days.len() != DAYS_PER_WEEK || days.iter().any(|d| d.meals.len() != MealType::ALL.len()) {
        return Err(Error::InvalidInput {
            message: "A weekly plan needs 7 days of 4 meals".to_string(),
        });
    }

    let txn = db.begin().await?;

    let plan = meal_plan::ActiveModel {
        user_id: Set(user_id.to_string()),
        title: Set(GENERATED_PLAN_TITLE.to_string()),
        week_start_date: Set(week_start_date),
        generated_by: Set(GENERATED_BY_AI.to_string()),
        summary_calories: Set(Some(summary.calories)),
        summary_protein: Set(Some(summary.protein)),
        summary_carbs: Set(Some(summary.carbs)),
        summary_fats: Set(Some(summary.fats)),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut slots = Vec::with_capacity(days.len() * MealType::ALL.len());
    for (day_index, day) in days.iter().enumerate() {
        for (type_index, slot) in day.meals.iter().enumerate() {
            let position = i32::try_from(day_index * MealType::ALL.len() + type_index)?;
            slots.push(plan_slot::ActiveModel {
                plan_id: Set(plan.id),
                position: Set(position),
                day: Set(day.day.as_str().to_string()),
                meal_type: Set(slot.meal_type.as_str().to_string()),
                meal_id: Set(slot.meal_id),
                ..Default::default()
            });
        }
    }
    PlanSlot::insert_many(slots).exec(&txn).await?;

    txn.commit().await?;
    info!("Saved meal plan {} for user {}", plan.id, user_id);
    Ok(plan)
}

async fn append_history(db: &DatabaseConnection, user_id: &str, plan_id: i64) -> Result<()> {
    plan_history::ActiveModel {
        user_id: Set(user_id.to_string()),
        plan_id: Set(plan_id),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(())
}

async fn log_generate_activity(db: &DatabaseConnection, user_id: &str, plan_id: i64) -> Result<()> {
    activity_log::ActiveModel {
        user_id: Set(user_id.to_string()),
        action: Set(GENERATE_ACTION.to_string()),
        metadata: Set(json!({ "planId": plan_id })),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(())
}

/// Creates the account row on first contact, otherwise bumps `last_active_at`.
pub async fn touch_last_active(db: &DatabaseConnection, user_id: &str) -> Result<()> {
    let account = user_account::ActiveModel {
        user_id: Set(user_id.to_string()),
        last_active_at: Set(Utc::now()),
    };
    UserAccount::insert(account)
        .on_conflict(
            OnConflict::column(user_account::Column::UserId)
                .update_column(user_account::Column::LastActiveAt)
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

/// Appends history, logs the activity and updates last-active for a freshly saved plan.
///
/// Each step is independent; failures are logged and never reach the caller.
pub async fn record_plan_history(db: &DatabaseConnection, user_id: &str, plan_id: i64) {
    if let Err(e) = append_history(db, user_id, plan_id).await {
        error!("Failed to append plan {} to history of {}: {}", plan_id, user_id, e);
    }
    if let Err(e) = log_generate_activity(db, user_id, plan_id).await {
        error!("Failed to log plan generation for {}: {}", user_id, e);
    }
    if let Err(e) = touch_last_active(db, user_id).await {
        error!("Failed to update last active time for {}: {}", user_id, e);
    }
}

/// Loads an active plan owned by `user_id`.
///
/// # Errors
/// Returns `Error::PlanNotFound` when the plan is missing, soft-deleted, or owned by someone
/// else.
pub async fn get_owned_plan<C>(db: &C, plan_id: i64, user_id: &str) -> Result<meal_plan::Model>
where
    C: ConnectionTrait,
{
    MealPlan::find_by_id(plan_id)
        .filter(meal_plan::Column::UserId.eq(user_id))
        .filter(meal_plan::Column::IsActive.eq(true))
        .one(db)
        .await?
        .ok_or_else(|| Error::PlanNotFound {
            id: plan_id.to_string(),
        })
}

/// Slots of a plan paired with their meals, in slot order.
async fn load_slots_with_meals<C>(
    db: &C,
    plan_id: i64,
) -> Result<Vec<(plan_slot::Model, meal::Model)>>
where
    C: ConnectionTrait,
{
    let slots = PlanSlot::find()
        .filter(plan_slot::Column::PlanId.eq(plan_id))
        .order_by_asc(plan_slot::Column::Position)
        .all(db)
        .await?;

    let ids: Vec<i64> = slots.iter().map(|s| s.meal_id).collect();
    let meals = get_meals_by_ids(db, &ids).await?;

    slots
        .into_iter()
        .map(|slot| {
            let meal = meals
                .get(&slot.meal_id)
                .cloned()
                .ok_or(Error::DanglingMeal {
                    plan_id,
                    meal_id: slot.meal_id,
                })?;
            Ok((slot, meal))
        })
        .collect()
}

/// Meals of every slot of a plan, in slot order. Repeated meals appear once per slot.
pub async fn load_plan_meals<C>(db: &C, plan_id: i64) -> Result<Vec<meal::Model>>
where
    C: ConnectionTrait,
{
    Ok(load_slots_with_meals(db, plan_id)
        .await?
        .into_iter()
        .map(|(_, meal)| meal)
        .collect())
}

/// A slot of a stored plan with its meal resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedMeal {
    pub meal_type: MealType,
    pub meal: meal::Model,
}

/// A day of a stored plan.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedDay {
    pub day: Weekday,
    pub meals: Vec<PlannedMeal>,
}

/// A stored plan with its grid resolved to meals.
#[derive(Debug, Clone, Serialize)]
pub struct PlanDetails {
    #[serde(flatten)]
    pub plan: meal_plan::Model,
    pub days: Vec<PlannedDay>,
}

/// Loads an owned plan with its 7x4 grid.
pub async fn get_plan_with_slots(
    db: &DatabaseConnection,
    plan_id: i64,
    user_id: &str,
) -> Result<PlanDetails> {
    let plan = get_owned_plan(db, plan_id, user_id).await?;
    let slots = load_slots_with_meals(db, plan.id).await?;

    let mut days: Vec<PlannedDay> = Weekday::ALL
        .into_iter()
        .map(|day| PlannedDay {
            day,
            meals: Vec::with_capacity(MealType::ALL.len()),
        })
        .collect();

    for (slot, meal) in slots {
        let (day, meal_type) = slot_position(usize::try_from(slot.position)?);
        if let Some(entry) = days.iter_mut().find(|d| d.day == day) {
            entry.meals.push(PlannedMeal { meal_type, meal });
        }
    }

    Ok(PlanDetails { plan, days })
}

/// Active plans generated for a user, newest first.
pub async fn list_plan_history(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<meal_plan::Model>> {
    let entries = PlanHistory::find()
        .filter(plan_history::Column::UserId.eq(user_id))
        .order_by_desc(plan_history::Column::CreatedAt)
        .order_by_desc(plan_history::Column::Id)
        .all(db)
        .await?;

    let plan_ids: Vec<i64> = entries.iter().map(|e| e.plan_id).collect();
    let mut plans = MealPlan::find()
        .filter(meal_plan::Column::Id.is_in(plan_ids.iter().copied()))
        .filter(meal_plan::Column::UserId.eq(user_id))
        .filter(meal_plan::Column::IsActive.eq(true))
        .all(db)
        .await?;

    // Keep history order; a plan appears once even if appended twice.
    let mut ordered = Vec::with_capacity(plans.len());
    for id in plan_ids {
        if let Some(index) = plans.iter().position(|p| p.id == id) {
            ordered.push(plans.swap_remove(index));
        }
    }
    debug!("History for {} has {} active plans", user_id, ordered.len());
    Ok(ordered)
}

/// Marks an owned plan inactive. Slots are kept.
pub async fn soft_delete_plan(db: &DatabaseConnection, plan_id: i64, user_id: &str) -> Result<()> {
    let plan = get_owned_plan(db, plan_id, user_id).await?;
    let mut active: meal_plan::ActiveModel = plan.into();
    active.is_active = Set(false);
    active.update(db).await?;
    info!("Soft-deleted meal plan {} for user {}", plan_id, user_id);
    Ok(())
}
