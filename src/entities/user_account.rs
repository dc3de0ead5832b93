//! User account entity - the slice of user state the planner touches.
//!
//! Accounts are owned by the authentication service; the planner only records when a
//! user was last active, creating the row on first contact.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User account database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_accounts")]
pub struct Model {
    /// User identifier issued by the authentication service
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    /// Last time the user generated or touched a plan
    pub last_active_at: DateTimeUtc,
}

/// `UserAccount` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
