//! Plan history entity - the ordered list of plans generated for a user.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Plan history database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plan_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// User the plan was generated for
    pub user_id: String,
    /// Plan that was appended
    pub plan_id: i64,
    /// When the entry was appended
    pub created_at: DateTimeUtc,
}

/// `PlanHistory` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
