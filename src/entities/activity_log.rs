//! Activity log entity - append-only record of user actions.
//!
//! The planner writes `GENERATE_MEAL_PLAN` entries whose metadata carries the new plan id.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Activity log database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "activity_log")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// User who performed the action
    pub user_id: String,
    /// Action name (e.g., `"GENERATE_MEAL_PLAN"`)
    pub action: String,
    /// Free-form JSON metadata for the action
    pub metadata: Json,
    /// When the action happened
    pub created_at: DateTimeUtc,
}

/// `ActivityLog` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
