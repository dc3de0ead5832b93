//! Plan slot entity - one (day, meal type) cell of a weekly plan.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Plan slot database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plan_slots")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Plan this slot belongs to
    pub plan_id: i64,
    /// Zero-based slot index, day-major (Monday breakfast = 0, Sunday snack = 27)
    pub position: i32,
    /// Lowercase weekday name
    pub day: String,
    /// `"breakfast"`, `"lunch"`, `"dinner"` or `"snack"`
    pub meal_type: String,
    /// Meal assigned to this slot
    pub meal_id: i64,
}

/// Defines relationships between `PlanSlot` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each slot belongs to one plan
    #[sea_orm(
        belongs_to = "super::meal_plan::Entity",
        from = "Column::PlanId",
        to = "super::meal_plan::Column::Id"
    )]
    MealPlan,
    /// Each slot references one meal
    #[sea_orm(
        belongs_to = "super::meal::Entity",
        from = "Column::MealId",
        to = "super::meal::Column::Id"
    )]
    Meal,
}

impl Related<super::meal_plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MealPlan.def()
    }
}

impl Related<super::meal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Meal.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
