//! Constraint profile entity - a user's real-world cooking limits.
//!
//! One row per user. Appliance ownership is stored as individual flags; the core converts
//! them into a name set before filtering.

use super::StringList;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Constraint profile database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "constraint_profiles")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user; at most one profile per user
    #[sea_orm(unique)]
    pub user_id: String,
    /// Longest acceptable cook time in minutes
    pub max_cook_time: i32,
    /// `"beginner"`, `"intermediate"` or `"advanced"`
    pub skill_level: String,
    pub has_gas_stove: bool,
    pub has_oven: bool,
    pub has_microwave: bool,
    pub has_air_fryer: bool,
    pub has_blender: bool,
    /// Lowercase weekday names the user cooks on; empty means no restriction
    pub cooking_days: StringList,
    /// When the profile was last written
    pub updated_at: DateTimeUtc,
}

/// `ConstraintProfile` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
