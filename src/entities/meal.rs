//! Meal entity - the read-only meal catalog.
//!
//! Each meal carries nutrition facts, free-text ingredient lines, diet-compatibility flags,
//! and the practical requirements (cook time, skill, appliances) the constraint filter checks.
//! The planner never writes to this table outside of seeding.

use super::StringList;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Meal database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "meals")]
pub struct Model {
    /// Unique identifier for the meal
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Chickpea Curry")
    pub name: String,
    /// Optional cuisine tag (e.g., "indian")
    pub cuisine: Option<String>,
    /// Declared meal type; informational only, slots are not matched against it
    pub meal_type: Option<String>,
    /// Energy in kcal
    pub calories: f64,
    /// Protein in grams
    pub protein: f64,
    /// Carbohydrates in grams
    pub carbs: f64,
    /// Fats in grams
    pub fats: f64,
    /// Fiber in grams
    pub fiber: f64,
    /// Sugar in grams
    pub sugar: f64,
    /// Sodium in milligrams
    pub sodium: f64,
    /// Glycemic index, when known
    pub glycemic_index: Option<f64>,
    /// Ordered ingredient lines such as `"2 cups rice"`
    pub ingredients: StringList,
    /// Declared allergens
    pub allergens: StringList,
    /// Diet compatibility flags
    pub is_vegetarian: bool,
    pub is_vegan: bool,
    pub is_gluten_free: bool,
    pub is_dairy_free: bool,
    pub is_nut_free: bool,
    /// `"low"`, `"medium"` or `"high"`
    pub cost_level: String,
    /// Cooking time in minutes
    pub cook_time: i32,
    /// `"beginner"`, `"intermediate"` or `"advanced"`
    pub skill_level: String,
    /// Appliance names the recipe needs (e.g., `"oven"`, `"air fryer"`)
    pub appliances: StringList,
    /// Inactive meals are hidden from candidate selection
    pub is_active: bool,
}

/// Defines relationships between Meal and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One meal can fill many plan slots
    #[sea_orm(has_many = "super::plan_slot::Entity")]
    PlanSlots,
}

impl Related<super::plan_slot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlanSlots.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
