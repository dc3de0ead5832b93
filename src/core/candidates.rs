//! Candidate selection - the bounded catalog query that starts plan generation.
//!
//! The query keeps active meals, narrows by the diet flags implied by the user's
//! restrictions and by the preferred budget tier, and caps the pool at
//! [`MAX_CANDIDATES`] rows in catalog order.

use crate::{
    core::profile::{Preferences, UserProfile},
    entities::{Meal, meal},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, QuerySelect, Select, prelude::*};
use tracing::{debug, instrument};

/// Hard cap on the candidate pool size.
pub const MAX_CANDIDATES: u64 = 200;

/// Builds the catalog query for a profile without executing it.
#[must_use]
pub fn candidate_query(profile: &UserProfile, preferences: &Preferences) -> Select<Meal> {
    let mut query = Meal::find().filter(meal::Column::IsActive.eq(true));

    if profile.has_restriction("vegetarian") {
        query = query.filter(meal::Column::IsVegetarian.eq(true));
    }
    if profile.has_restriction("vegan") {
        query = query.filter(meal::Column::IsVegan.eq(true));
    }
    if profile.has_restriction("gluten_free") {
        query = query.filter(meal::Column::IsGlutenFree.eq(true));
    }
    if let Some(tier) = preferences.budget_tier {
        query = query.filter(meal::Column::CostLevel.eq(tier.as_str()));
    }

    query
        .order_by_asc(meal::Column::Id)
        .limit(MAX_CANDIDATES)
}

/// Fetches the candidate pool for a user.
///
/// # Errors
/// Returns `Error::NoCandidates` when the query yields no rows.
#[instrument(skip_all)]
pub async fn select_candidates<C>(
    db: &C,
    profile: &UserProfile,
    preferences: &Preferences,
) -> Result<Vec<meal::Model>>
where
    C: ConnectionTrait,
{
    let candidates = candidate_query(profile, preferences).all(db).await?;
    debug!("Candidate selector returned {} meals", candidates.len());

    if candidates.is_empty() {
        return Err(Error::NoCandidates);
    }
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::profile::CostLevel;
    use crate::test_utils::*;

    fn profile_with(restrictions: &[&str]) -> UserProfile {
        UserProfile {
            dietary_restrictions: restrictions.iter().map(|r| (*r).to_string()).collect(),
            ..UserProfile::default()
        }
    }

    #[tokio::test]
    async fn test_select_candidates_filters_diet_flags() -> Result<()> {
        let db = setup_test_db().await?;

        let mut veg = meal_seed("Veg Curry", &["1 onion"]);
        veg.is_vegetarian = true;
        let veg = crate::core::catalog::create_meal(&db, &veg).await?;
        create_test_meal(&db, "Beef Stew").await?;

        let meals =
            select_candidates(&db, &profile_with(&["vegetarian"]), &Preferences::default())
                .await?;
        assert_eq!(meals.len(), 1);
        assert_eq!(meals[0].id, veg.id);

        let all = select_candidates(&db, &profile_with(&[]), &Preferences::default()).await?;
        assert_eq!(all.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_select_candidates_filters_budget_tier() -> Result<()> {
        let db = setup_test_db().await?;

        let mut cheap = meal_seed("Rice and Beans", &["1 cup rice"]);
        cheap.cost_level = "low".to_string();
        crate::core::catalog::create_meal(&db, &cheap).await?;
        create_test_meal(&db, "Steak Dinner").await?;

        let prefs = Preferences {
            budget_tier: Some(CostLevel::Low),
            ..Preferences::default()
        };
        let meals = select_candidates(&db, &profile_with(&[]), &prefs).await?;
        assert_eq!(meals.len(), 1);
        assert_eq!(meals[0].name, "Rice and Beans");
        Ok(())
    }

    #[tokio::test]
    async fn test_select_candidates_excludes_inactive() -> Result<()> {
        let db = setup_test_db().await?;
        let retired = create_test_meal(&db, "Retired Meal").await?;
        deactivate_meal(&db, retired.id).await?;
        let kept = create_test_meal(&db, "Current Meal").await?;

        let meals = select_candidates(&db, &profile_with(&[]), &Preferences::default()).await?;
        assert_eq!(meals.len(), 1);
        assert_eq!(meals[0].id, kept.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_select_candidates_caps_pool() -> Result<()> {
        let db = setup_test_db().await?;
        for i in 0..205 {
            create_test_meal(&db, &format!("Meal {i}")).await?;
        }
        let meals = select_candidates(&db, &profile_with(&[]), &Preferences::default()).await?;
        assert_eq!(meals.len(), 200);
        assert_eq!(meals[0].name, "Meal 0");
        Ok(())
    }

    #[tokio::test]
    async fn test_select_candidates_empty_is_no_candidates() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_meal(&db, "Omelette").await?;

        let result =
            select_candidates(&db, &profile_with(&["vegan"]), &Preferences::default()).await;
        assert!(matches!(result, Err(Error::NoCandidates)));
        Ok(())
    }
}
