//! Meal catalog access.
//!
//! The catalog is owned by the meal management service; the planner only reads it. The one
//! write path here is seeding from `config.toml`, used to stand up a catalog for local runs
//! and tests.

use crate::{
    config::settings::MealSeed,
    core::profile::{CostLevel, SkillLevel},
    entities::{Meal, meal},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

/// Inserts a catalog meal after validating its fields.
///
/// Names are trimmed; cost and skill levels must be known values and the cook time must be
/// non-negative.
pub async fn create_meal<C>(db: &C, seed: &MealSeed) -> Result<meal::Model>
where
    C: ConnectionTrait,
{
    let name = seed.name.trim();
    if name.is_empty() {
        return Err(Error::InvalidInput {
            message: "Meal name cannot be empty".to_string(),
        });
    }
    if seed.cook_time < 0 {
        return Err(Error::InvalidInput {
            message: format!("Cook time for '{name}' cannot be negative"),
        });
    }
    let cost_level: CostLevel = seed.cost_level.parse()?;
    let skill_level: SkillLevel = seed.skill_level.parse()?;

    let meal = meal::ActiveModel {
        name: Set(name.to_string()),
        cuisine: Set(seed.cuisine.clone()),
        meal_type: Set(seed.meal_type.clone()),
        calories: Set(seed.calories),
        protein: Set(seed.protein),
        carbs: Set(seed.carbs),
        fats: Set(seed.fats),
        fiber: Set(seed.fiber),
        sugar: Set(seed.sugar),
        sodium: Set(seed.sodium),
        glycemic_index: Set(seed.glycemic_index),
        ingredients: Set(seed.ingredients.clone().into()),
        allergens: Set(seed.allergens.clone().into()),
        is_vegetarian: Set(seed.is_vegetarian),
        is_vegan: Set(seed.is_vegan),
        is_gluten_free: Set(seed.is_gluten_free),
        is_dairy_free: Set(seed.is_dairy_free),
        is_nut_free: Set(seed.is_nut_free),
        cost_level: Set(cost_level.as_str().to_string()),
        cook_time: Set(seed.cook_time),
        skill_level: Set(skill_level.as_str().to_string()),
        appliances: Set(seed.appliances.clone().into()),
        is_active: Set(true),
        ..Default::default()
    };

    Ok(meal.insert(db).await?)
}

/// Seeds the catalog from configuration, skipping meals whose name already exists.
///
/// Returns the number of meals inserted. Invalid seed entries are logged and skipped so a
/// single bad entry does not block startup.
#[instrument(skip(db, seeds), fields(seed_count = seeds.len()))]
pub async fn seed_meals(db: &DatabaseConnection, seeds: &[MealSeed]) -> Result<usize> {
    let mut inserted = 0;
    for seed in seeds {
        let existing = Meal::find()
            .filter(meal::Column::Name.eq(seed.name.trim()))
            .filter(meal::Column::IsActive.eq(true))
            .one(db)
            .await?;
        if existing.is_some() {
            debug!("Meal '{}' already in catalog, skipping", seed.name);
            continue;
        }

        match create_meal(db, seed).await {
            Ok(created) => {
                debug!("Seeded meal '{}' with id {}", created.name, created.id);
                inserted += 1;
            }
            Err(Error::InvalidInput { message }) => {
                warn!("Skipping invalid seed meal '{}': {}", seed.name, message);
            }
            Err(e) => return Err(e),
        }
    }
    info!("Seeded {} catalog meals", inserted);
    Ok(inserted)
}

/// Loads the given meals keyed by id. Missing ids are simply absent from the map.
pub async fn get_meals_by_ids<C>(db: &C, ids: &[i64]) -> Result<HashMap<i64, meal::Model>>
where
    C: ConnectionTrait,
{
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let meals = Meal::find()
        .filter(meal::Column::Id.is_in(ids.iter().copied()))
        .all(db)
        .await?;
    Ok(meals.into_iter().map(|m| (m.id, m)).collect())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_meal_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let mut seed = meal_seed("  ", &["1 onion"]);
        assert!(matches!(
            create_meal(&db, &seed).await,
            Err(Error::InvalidInput { .. })
        ));

        seed.name = "Soup".to_string();
        seed.cook_time = -5;
        assert!(matches!(
            create_meal(&db, &seed).await,
            Err(Error::InvalidInput { .. })
        ));

        seed.cook_time = 10;
        seed.skill_level = "chef".to_string();
        assert!(matches!(
            create_meal(&db, &seed).await,
            Err(Error::InvalidInput { .. })
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_seed_meals_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let seeds = vec![
            meal_seed("Oat Porridge", &["1 cup oats"]),
            meal_seed("Lentil Soup", &["1 cup lentils"]),
        ];

        assert_eq!(seed_meals(&db, &seeds).await?, 2);
        assert_eq!(seed_meals(&db, &seeds).await?, 0);
        assert_eq!(Meal::find().all(&db).await?.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_seed_meals_skips_invalid_entries() -> Result<()> {
        let db = setup_test_db().await?;
        let mut bad = meal_seed("Mystery Stew", &[]);
        bad.cost_level = "priceless".to_string();
        let seeds = vec![bad, meal_seed("Rice Bowl", &["1 cup rice"])];

        assert_eq!(seed_meals(&db, &seeds).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_meals_by_ids() -> Result<()> {
        let db = setup_test_db().await?;
        let a = create_test_meal(&db, "A").await?;
        let b = create_test_meal(&db, "B").await?;

        let found = get_meals_by_ids(&db, &[a.id, b.id, 9999]).await?;
        assert_eq!(found.len(), 2);
        assert_eq!(found.get(&a.id).unwrap().name, "A");
        assert!(get_meals_by_ids(&db, &[]).await?.is_empty());
        Ok(())
    }
}
