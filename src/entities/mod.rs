//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod activity_log;
pub mod constraint_profile;
pub mod meal;
pub mod meal_plan;
pub mod plan_history;
pub mod plan_slot;
pub mod user_account;

use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

// Re-export specific types to avoid conflicts
pub use activity_log::{
    Column as ActivityLogColumn, Entity as ActivityLog, Model as ActivityLogModel,
};
pub use constraint_profile::{
    Column as ConstraintProfileColumn, Entity as ConstraintProfile,
    Model as ConstraintProfileModel,
};
pub use meal::{Column as MealColumn, Entity as Meal, Model as MealModel};
pub use meal_plan::{Column as MealPlanColumn, Entity as MealPlan, Model as MealPlanModel};
pub use plan_history::{
    Column as PlanHistoryColumn, Entity as PlanHistory, Model as PlanHistoryModel,
};
pub use plan_slot::{Column as PlanSlotColumn, Entity as PlanSlot, Model as PlanSlotModel};
pub use user_account::{
    Column as UserAccountColumn, Entity as UserAccount, Model as UserAccountModel,
};

/// A list of strings stored as a JSON array column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct StringList(pub Vec<String>);

impl StringList {
    /// Iterates over the stored strings.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    /// Returns true when the list holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for StringList {
    fn from(values: Vec<String>) -> Self {
        Self(values)
    }
}

impl From<&[&str]> for StringList {
    fn from(values: &[&str]) -> Self {
        Self(values.iter().map(|v| (*v).to_string()).collect())
    }
}
