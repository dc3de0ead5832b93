//! Meal plan entity - a generated (or manual) weekly plan owned by one user.
//!
//! The 7x4 grid itself lives in `plan_slots`; this row carries ownership, the week start,
//! the optional per-day nutrition summary, and the soft-delete flag.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Meal plan database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "meal_plans")]
pub struct Model {
    /// Unique identifier for the plan
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user id
    pub user_id: String,
    /// Display title
    pub title: String,
    /// First day of the planned week
    pub week_start_date: Date,
    /// `"ai"` for pipeline output, `"manual"` otherwise
    pub generated_by: String,
    /// Average daily calories across the plan
    pub summary_calories: Option<f64>,
    /// Average daily protein in grams
    pub summary_protein: Option<f64>,
    /// Average daily carbohydrates in grams
    pub summary_carbs: Option<f64>,
    /// Average daily fats in grams
    pub summary_fats: Option<f64>,
    /// Soft delete flag - inactive plans behave as if they do not exist
    pub is_active: bool,
    /// When the plan was written
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `MealPlan` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One plan has exactly 28 slots
    #[sea_orm(has_many = "super::plan_slot::Entity")]
    PlanSlots,
}

impl Related<super::plan_slot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlanSlots.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
