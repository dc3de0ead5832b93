//! Weekly assignment - maps a ranked meal list onto the fixed 7x4 grid.
//!
//! Slot `i` (day-major, Monday breakfast = 0 through Sunday snack = 27) receives
//! `ranked[i % ranked.len()]`. Meals are not matched to the slot's meal type and repeats are
//! allowed; every slot is always filled as long as the list is non-empty.

use crate::{
    entities::meal,
    errors::{Error, Result},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Days in a weekly plan.
pub const DAYS_PER_WEEK: usize = 7;
/// Meal slots per day.
pub const SLOTS_PER_DAY: usize = 4;
/// Total slots in a weekly plan.
pub const SLOTS_PER_WEEK: usize = DAYS_PER_WEEK * SLOTS_PER_DAY;

/// Day of the week, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All days in plan order.
    pub const ALL: [Self; DAYS_PER_WEEK] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    /// Lowercase name as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        }
    }
}

impl FromStr for Weekday {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|day| day.as_str() == lowered)
            .ok_or_else(|| Error::InvalidInput {
                message: format!("Unknown weekday '{s}'"),
            })
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Meal slot within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    /// All meal types in slot order.
    pub const ALL: [Self; SLOTS_PER_DAY] = [Self::Breakfast, Self::Lunch, Self::Dinner, Self::Snack];

    /// Lowercase name as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snack => "snack",
        }
    }
}

/// One filled slot of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotAssignment {
    pub meal_type: MealType,
    pub meal_id: i64,
}

/// One day of the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAssignment {
    pub day: Weekday,
    pub meals: Vec<SlotAssignment>,
}

/// Day and meal type of the slot at `slot_index` (day-major).
#[must_use]
pub const fn slot_position(slot_index: usize) -> (Weekday, MealType) {
    (
        Weekday::ALL[(slot_index / SLOTS_PER_DAY) % DAYS_PER_WEEK],
        MealType::ALL[slot_index % SLOTS_PER_DAY],
    )
}

/// The entry of `ranked` assigned to slot `slot_index`, or `None` for an empty list.
#[must_use]
pub fn meal_for_slot<T>(ranked: &[T], slot_index: usize) -> Option<&T> {
    if ranked.is_empty() {
        return None;
    }
    ranked.get(slot_index % ranked.len())
}

/// Builds the 7x4 weekly grid from a ranked meal list.
///
/// # Errors
/// Returns `Error::NoFeasibleMeals` if `ranked` is empty.
pub fn build_weekly_plan(ranked: &[meal::Model]) -> Result<Vec<DayAssignment>> {
    if ranked.is_empty() {
        return Err(Error::NoFeasibleMeals);
    }

    Ok(Weekday::ALL
        .into_iter()
        .enumerate()
        .map(|(day_index, day)| DayAssignment {
            day,
            meals: MealType::ALL
                .into_iter()
                .enumerate()
                .filter_map(|(type_index, meal_type)| {
                    let slot_index = day_index * SLOTS_PER_DAY + type_index;
                    meal_for_slot(ranked, slot_index).map(|meal| SlotAssignment {
                        meal_type,
                        meal_id: meal.id,
                    })
                })
                .collect(),
        })
        .collect())
}
