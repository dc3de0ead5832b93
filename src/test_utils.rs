//! Shared test utilities for the meal planner.
//!
//! This module provides common helper functions for setting up test databases
//! and creating catalog meals and plans with sensible defaults.

use crate::{
    config::settings::MealSeed,
    core::{
        catalog,
        plan::{self, NutritionSummary},
        schedule::build_weekly_plan,
    },
    entities::{self, meal},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, QueryOrder, Set, prelude::*};
use tracing_subscriber::EnvFilter;

/// Routes `tracing` output through the test harness. Safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// A catalog seed with sensible defaults.
///
/// # Defaults
/// * 400 kcal, 20 g protein, 50 g carbs, 12 g fats
/// * `cost_level`: "medium", `skill_level`: "beginner"
/// * `cook_time`: 15 minutes, no appliances, no diet flags
#[must_use]
pub fn meal_seed(name: &str, ingredients: &[&str]) -> MealSeed {
    MealSeed {
        name: name.to_string(),
        cuisine: None,
        meal_type: None,
        calories: 400.0,
        protein: 20.0,
        carbs: 50.0,
        fats: 12.0,
        fiber: 0.0,
        sugar: 0.0,
        sodium: 0.0,
        glycemic_index: None,
        ingredients: ingredients.iter().map(|i| (*i).to_string()).collect(),
        allergens: Vec::new(),
        is_vegetarian: false,
        is_vegan: false,
        is_gluten_free: false,
        is_dairy_free: false,
        is_nut_free: false,
        cost_level: "medium".to_string(),
        cook_time: 15,
        skill_level: "beginner".to_string(),
        appliances: Vec::new(),
    }
}

/// Inserts a default meal whose ingredients are one cup of rice and two tomatoes.
pub async fn create_test_meal(db: &DatabaseConnection, name: &str) -> Result<meal::Model> {
    catalog::create_meal(db, &meal_seed(name, &["1 cup rice", "2 tomatoes"])).await
}

/// Marks a catalog meal inactive.
pub async fn deactivate_meal(db: &DatabaseConnection, meal_id: i64) -> Result<()> {
    let meal = entities::Meal::find_by_id(meal_id)
        .one(db)
        .await?
        .ok_or_else(|| crate::errors::Error::InvalidInput {
            message: format!("No meal {meal_id}"),
        })?;
    let mut active: meal::ActiveModel = meal.into();
    active.is_active = Set(false);
    active.update(db).await?;
    Ok(())
}

/// An unsaved meal model for pure-function tests.
#[must_use]
pub fn meal_model(
    id: i64,
    name: &str,
    cook_time: i32,
    skill_level: &str,
    appliances: &[&str],
) -> meal::Model {
    meal::Model {
        id,
        name: name.to_string(),
        cuisine: None,
        meal_type: None,
        calories: 400.0,
        protein: 20.0,
        carbs: 50.0,
        fats: 12.0,
        fiber: 0.0,
        sugar: 0.0,
        sodium: 0.0,
        glycemic_index: None,
        ingredients: entities::StringList::default(),
        allergens: entities::StringList::default(),
        is_vegetarian: false,
        is_vegan: false,
        is_gluten_free: false,
        is_dairy_free: false,
        is_nut_free: false,
        cost_level: "medium".to_string(),
        cook_time,
        skill_level: skill_level.to_string(),
        appliances: appliances.into(),
        is_active: true,
    }
}

/// Saves a plan for `user_id` that rotates one freshly created test meal through all slots.
pub async fn create_test_plan(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<entities::meal_plan::Model> {
    let meal = create_test_meal(db, "Plan Meal").await?;
    let days = build_weekly_plan(&[meal])?;
    let week = NaiveDate::from_ymd_opt(2025, 1, 13).unwrap_or_default();
    plan::save_meal_plan(db, user_id, week, &days, &NutritionSummary::default()).await
}

/// Activity entries of a user, newest first.
pub async fn list_activity(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<entities::activity_log::Model>> {
    Ok(entities::ActivityLog::find()
        .filter(entities::activity_log::Column::UserId.eq(user_id))
        .order_by_desc(entities::activity_log::Column::Id)
        .all(db)
        .await?)
}
