//! Real-world cooking constraints - storage and the feasibility filter.
//!
//! A stored constraint profile keeps appliance ownership as boolean flags. Before filtering,
//! the flags become a set of [`Appliance`] values so a meal's required-appliance list can be
//! checked with a plain subset test. Users without a stored profile get
//! [`CookingConstraints::default`], a lenient profile rather than an error.

use crate::{
    core::{profile::SkillLevel, schedule::Weekday},
    entities::{ConstraintProfile, constraint_profile, meal},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*, sea_query::OnConflict};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info, instrument};

/// Default maximum cook time for users without a constraint profile.
pub const DEFAULT_MAX_COOK_TIME: i32 = 30;

/// Kitchen appliances a meal may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Appliance {
    GasStove,
    Oven,
    Microwave,
    AirFryer,
    Blender,
}

impl Appliance {
    /// Parses a free-text appliance name; case, spaces, `-` and `_` are ignored.
    ///
    /// Returns `None` for names outside the known set.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let compact: String = name
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_lowercase();
        match compact.as_str() {
            "gasstove" | "stove" | "stovetop" => Some(Self::GasStove),
            "oven" => Some(Self::Oven),
            "microwave" => Some(Self::Microwave),
            "airfryer" => Some(Self::AirFryer),
            "blender" => Some(Self::Blender),
            _ => None,
        }
    }
}

/// Appliance ownership as the flags clients send and the database stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplianceFlags {
    pub has_gas_stove: bool,
    pub has_oven: bool,
    pub has_microwave: bool,
    pub has_air_fryer: bool,
    pub has_blender: bool,
}

impl Default for ApplianceFlags {
    fn default() -> Self {
        Self {
            has_gas_stove: true,
            has_oven: false,
            has_microwave: true,
            has_air_fryer: false,
            has_blender: false,
        }
    }
}

impl ApplianceFlags {
    /// The set of appliances these flags mark as owned.
    #[must_use]
    pub fn owned(&self) -> BTreeSet<Appliance> {
        [
            (self.has_gas_stove, Appliance::GasStove),
            (self.has_oven, Appliance::Oven),
            (self.has_microwave, Appliance::Microwave),
            (self.has_air_fryer, Appliance::AirFryer),
            (self.has_blender, Appliance::Blender),
        ]
        .into_iter()
        .filter_map(|(owned, appliance)| owned.then_some(appliance))
        .collect()
    }
}

/// Constraints applied by the feasibility filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookingConstraints {
    /// Longest acceptable cook time in minutes
    pub max_cook_time: i32,
    /// Highest recipe skill the user can handle
    pub skill_level: SkillLevel,
    /// Appliances the user owns
    pub appliances: BTreeSet<Appliance>,
    /// Days the user cooks on; empty means every day
    pub cooking_days: Vec<Weekday>,
}

impl Default for CookingConstraints {
    fn default() -> Self {
        Self {
            max_cook_time: DEFAULT_MAX_COOK_TIME,
            skill_level: SkillLevel::Beginner,
            appliances: ApplianceFlags::default().owned(),
            cooking_days: Vec::new(),
        }
    }
}

impl From<&constraint_profile::Model> for CookingConstraints {
    fn from(model: &constraint_profile::Model) -> Self {
        Self {
            max_cook_time: model.max_cook_time,
            skill_level: model.skill_level.parse().unwrap_or_default(),
            appliances: flags_of(model).owned(),
            cooking_days: model
                .cooking_days
                .iter()
                .filter_map(|d| d.parse().ok())
                .collect(),
        }
    }
}

/// Appliance flags stored on a profile row.
#[must_use]
pub fn flags_of(model: &constraint_profile::Model) -> ApplianceFlags {
    ApplianceFlags {
        has_gas_stove: model.has_gas_stove,
        has_oven: model.has_oven,
        has_microwave: model.has_microwave,
        has_air_fryer: model.has_air_fryer,
        has_blender: model.has_blender,
    }
}

/// Returns true when `meal` can be cooked under `constraints`.
///
/// A meal is rejected when it takes longer than the maximum cook time, needs a higher skill
/// level, or requires any appliance the user does not own. Unrecognized appliance names are
/// never owned. An unrecognized meal skill level does not reject the meal.
#[must_use]
pub fn is_feasible(meal: &meal::Model, constraints: &CookingConstraints) -> bool {
    if meal.cook_time > constraints.max_cook_time {
        return false;
    }

    if let Ok(required_skill) = meal.skill_level.parse::<SkillLevel>() {
        if required_skill.rank() > constraints.skill_level.rank() {
            return false;
        }
    }

    meal.appliances.iter().all(|name| {
        Appliance::parse(name).is_some_and(|appliance| constraints.appliances.contains(&appliance))
    })
}

/// Keeps the candidates that satisfy `constraints`, preserving their order.
///
/// # Errors
/// Returns `Error::NoFeasibleMeals` when no candidate survives.
pub fn apply_constraints(
    candidates: Vec<meal::Model>,
    constraints: &CookingConstraints,
) -> Result<Vec<meal::Model>> {
    let before = candidates.len();
    let feasible: Vec<meal::Model> = candidates
        .into_iter()
        .filter(|meal| is_feasible(meal, constraints))
        .collect();
    debug!(
        "Constraint filter kept {} of {} candidates",
        feasible.len(),
        before
    );

    if feasible.is_empty() {
        return Err(Error::NoFeasibleMeals);
    }
    Ok(feasible)
}

/// Fetches the stored constraint profile for a user, if any.
pub async fn get_constraints<C>(
    db: &C,
    user_id: &str,
) -> Result<Option<constraint_profile::Model>>
where
    C: ConnectionTrait,
{
    ConstraintProfile::find()
        .filter(constraint_profile::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Loads the constraints used for filtering, falling back to the lenient default.
pub async fn load_constraints<C>(db: &C, user_id: &str) -> Result<CookingConstraints>
where
    C: ConnectionTrait,
{
    Ok(get_constraints(db, user_id)
        .await?
        .as_ref()
        .map_or_else(CookingConstraints::default, CookingConstraints::from))
}

/// Partial update for a constraint profile. Absent fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConstraintUpdate {
    pub max_cook_time: Option<i32>,
    pub skill_level: Option<SkillLevel>,
    pub appliances: Option<ApplianceFlags>,
    pub cooking_days: Option<Vec<String>>,
}

/// Creates or updates the user's constraint profile.
///
/// New profiles start from the lenient defaults before `update` is applied.
///
/// # Errors
/// Returns `Error::InvalidInput` for a negative cook time or an unknown weekday.
#[instrument(skip(db, update))]
pub async fn upsert_constraints(
    db: &DatabaseConnection,
    user_id: &str,
    update: &ConstraintUpdate,
) -> Result<constraint_profile::Model> {
    if let Some(minutes) = update.max_cook_time {
        if minutes < 0 {
            return Err(Error::InvalidInput {
                message: "maxCookTime cannot be negative".to_string(),
            });
        }
    }
    let cooking_days = update
        .cooking_days
        .as_ref()
        .map(|days| {
            days.iter()
                .map(|d| d.parse::<Weekday>().map(|w| w.as_str().to_string()))
                .collect::<Result<Vec<String>>>()
        })
        .transpose()?;

    // Columns a conflicting row takes from this request; absent fields keep their value.
    let mut changed = vec![constraint_profile::Column::UpdatedAt];
    if update.max_cook_time.is_some() {
        changed.push(constraint_profile::Column::MaxCookTime);
    }
    if update.skill_level.is_some() {
        changed.push(constraint_profile::Column::SkillLevel);
    }
    if update.appliances.is_some() {
        changed.extend([
            constraint_profile::Column::HasGasStove,
            constraint_profile::Column::HasOven,
            constraint_profile::Column::HasMicrowave,
            constraint_profile::Column::HasAirFryer,
            constraint_profile::Column::HasBlender,
        ]);
    }
    if cooking_days.is_some() {
        changed.push(constraint_profile::Column::CookingDays);
    }

    let mut active = constraint_profile::ActiveModel {
        user_id: Set(user_id.to_string()),
        max_cook_time: Set(update.max_cook_time.unwrap_or(DEFAULT_MAX_COOK_TIME)),
        skill_level: Set(update
            .skill_level
            .unwrap_or_default()
            .as_str()
            .to_string()),
        cooking_days: Set(cooking_days.unwrap_or_default().into()),
        updated_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    set_flags(&mut active, update.appliances.unwrap_or_default());

    ConstraintProfile::insert(active)
        .on_conflict(
            OnConflict::column(constraint_profile::Column::UserId)
                .update_columns(changed)
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    let saved = get_constraints(db, user_id)
        .await?
        .ok_or(Error::ConstraintsNotFound)?;

    info!("Saved constraint profile for user {}", user_id);
    Ok(saved)
}

fn set_flags(active: &mut constraint_profile::ActiveModel, flags: ApplianceFlags) {
    active.has_gas_stove = Set(flags.has_gas_stove);
    active.has_oven = Set(flags.has_oven);
    active.has_microwave = Set(flags.has_microwave);
    active.has_air_fryer = Set(flags.has_air_fryer);
    active.has_blender = Set(flags.has_blender);
}

/// Removes the user's constraint profile. Returns whether a profile existed.
pub async fn delete_constraints(db: &DatabaseConnection, user_id: &str) -> Result<bool> {
    let result = ConstraintProfile::delete_many()
        .filter(constraint_profile::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    fn constraints(max_cook_time: i32, skill: SkillLevel, owned: &[Appliance]) -> CookingConstraints {
        CookingConstraints {
            max_cook_time,
            skill_level: skill,
            appliances: owned.iter().copied().collect(),
            cooking_days: Vec::new(),
        }
    }

    #[test]
    fn test_cook_time_over_limit_is_rejected() {
        let slow = meal_model(1, "Slow Roast", 25, "beginner", &[]);
        let quick = meal_model(2, "Quick Salad", 20, "beginner", &[]);
        let limits = constraints(20, SkillLevel::Advanced, &[]);

        assert!(!is_feasible(&slow, &limits));
        assert!(is_feasible(&quick, &limits));
    }

    #[test]
    fn test_skill_level_is_ordinal() {
        let advanced = meal_model(1, "Souffle", 10, "advanced", &[]);
        let intermediate = meal_model(2, "Risotto", 10, "intermediate", &[]);
        let limits = constraints(60, SkillLevel::Intermediate, &[]);

        assert!(!is_feasible(&advanced, &limits));
        assert!(is_feasible(&intermediate, &limits));
    }

    #[test]
    fn test_required_appliances_must_be_owned() {
        let baked = meal_model(1, "Baked Ziti", 10, "beginner", &["oven"]);
        let fried = meal_model(2, "Wings", 10, "beginner", &["Air Fryer"]);
        let exotic = meal_model(3, "Sous Vide Egg", 10, "beginner", &["sous vide"]);
        let limits = constraints(60, SkillLevel::Advanced, &[Appliance::AirFryer]);

        assert!(!is_feasible(&baked, &limits));
        assert!(is_feasible(&fried, &limits));
        assert!(!is_feasible(&exotic, &limits));
    }

    #[test]
    fn test_default_constraints_are_lenient_profile() {
        let defaults = CookingConstraints::default();
        assert_eq!(defaults.max_cook_time, 30);
        assert_eq!(defaults.skill_level, SkillLevel::Beginner);
        assert!(defaults.appliances.contains(&Appliance::GasStove));
        assert!(defaults.appliances.contains(&Appliance::Microwave));
        assert!(!defaults.appliances.contains(&Appliance::Oven));
        assert!(defaults.cooking_days.is_empty());
    }

    #[test]
    fn test_apply_constraints_preserves_order() {
        let meals = vec![
            meal_model(3, "C", 10, "beginner", &[]),
            meal_model(1, "A", 45, "beginner", &[]),
            meal_model(2, "B", 15, "beginner", &[]),
        ];
        let kept = apply_constraints(meals, &CookingConstraints::default()).unwrap();
        let ids: Vec<i64> = kept.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn test_apply_constraints_empty_is_no_feasible_meals() {
        let meals = vec![meal_model(1, "Roast", 120, "advanced", &["oven"])];
        let result = apply_constraints(meals, &CookingConstraints::default());
        assert!(matches!(result, Err(Error::NoFeasibleMeals)));
    }

    #[test]
    fn test_appliance_parse_variants() {
        assert_eq!(Appliance::parse("gas_stove"), Some(Appliance::GasStove));
        assert_eq!(Appliance::parse("Air-Fryer"), Some(Appliance::AirFryer));
        assert_eq!(Appliance::parse("toaster"), None);
    }

    #[tokio::test]
    async fn test_load_constraints_defaults_when_absent() -> Result<()> {
        let db = setup_test_db().await?;
        let loaded = load_constraints(&db, "nobody").await?;
        assert_eq!(loaded, CookingConstraints::default());
        Ok(())
    }

    #[tokio::test]
    async fn test_upsert_constraints_creates_then_updates() -> Result<()> {
        let db = setup_test_db().await?;

        let created = upsert_constraints(
            &db,
            "user1",
            &ConstraintUpdate {
                max_cook_time: Some(45),
                cooking_days: Some(vec!["Monday".to_string(), "friday".to_string()]),
                ..ConstraintUpdate::default()
            },
        )
        .await?;
        assert_eq!(created.max_cook_time, 45);
        assert_eq!(created.skill_level, "beginner");
        assert!(created.has_gas_stove);
        assert_eq!(created.cooking_days.0, vec!["monday", "friday"]);

        let updated = upsert_constraints(
            &db,
            "user1",
            &ConstraintUpdate {
                skill_level: Some(SkillLevel::Advanced),
                appliances: Some(ApplianceFlags {
                    has_oven: true,
                    ..ApplianceFlags::default()
                }),
                ..ConstraintUpdate::default()
            },
        )
        .await?;
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.max_cook_time, 45);
        assert_eq!(updated.skill_level, "advanced");
        assert!(updated.has_oven);

        let loaded = load_constraints(&db, "user1").await?;
        assert_eq!(loaded.skill_level, SkillLevel::Advanced);
        assert!(loaded.appliances.contains(&Appliance::Oven));
        assert_eq!(loaded.cooking_days, vec![Weekday::Monday, Weekday::Friday]);
        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_first_upserts_share_one_profile() -> Result<()> {
        let db = setup_test_db().await?;
        let slow = ConstraintUpdate {
            max_cook_time: Some(60),
            ..ConstraintUpdate::default()
        };
        let skilled = ConstraintUpdate {
            skill_level: Some(SkillLevel::Intermediate),
            ..ConstraintUpdate::default()
        };

        let (first, second) = tokio::join!(
            upsert_constraints(&db, "user1", &slow),
            upsert_constraints(&db, "user1", &skilled),
        );
        assert_eq!(first?.id, second?.id);

        let stored = get_constraints(&db, "user1")
            .await?
            .ok_or(Error::ConstraintsNotFound)?;
        assert_eq!(stored.max_cook_time, 60);
        assert_eq!(stored.skill_level, "intermediate");
        assert_eq!(ConstraintProfile::find().count(&db).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_upsert_constraints_rejects_bad_input() -> Result<()> {
        let db = setup_test_db().await?;

        let negative = ConstraintUpdate {
            max_cook_time: Some(-1),
            ..ConstraintUpdate::default()
        };
        assert!(matches!(
            upsert_constraints(&db, "user1", &negative).await,
            Err(Error::InvalidInput { .. })
        ));

        let bad_day = ConstraintUpdate {
            cooking_days: Some(vec!["someday".to_string()]),
            ..ConstraintUpdate::default()
        };
        assert!(matches!(
            upsert_constraints(&db, "user1", &bad_day).await,
            Err(Error::InvalidInput { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_constraints() -> Result<()> {
        let db = setup_test_db().await?;
        upsert_constraints(&db, "user1", &ConstraintUpdate::default()).await?;

        assert!(delete_constraints(&db, "user1").await?);
        assert!(!delete_constraints(&db, "user1").await?);
        assert!(get_constraints(&db, "user1").await?.is_none());
        Ok(())
    }
}
