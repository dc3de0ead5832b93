//! User profile and preference types.
//!
//! These arrive with each request from the account service and are never persisted by the
//! planner. Ordinal values (skill level, budget tier, activity level) are closed enums with an
//! explicit `rank`, so comparisons never depend on string ordering.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Cooking skill, ordered beginner < intermediate < advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    /// Ordinal rank: beginner = 1, intermediate = 2, advanced = 3.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Beginner => 1,
            Self::Intermediate => 2,
            Self::Advanced => 3,
        }
    }

    /// Lowercase name as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl FromStr for SkillLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            other => Err(Error::InvalidInput {
                message: format!("Unknown skill level '{other}'"),
            }),
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Budget tier of a user and cost level of a meal, ordered low < medium < high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostLevel {
    Low,
    Medium,
    High,
}

impl CostLevel {
    /// Lowercase name as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for CostLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(Error::InvalidInput {
                message: format!("Unknown cost level '{other}'"),
            }),
        }
    }
}

/// Five-step physical activity scale, ordered from sedentary to very active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    #[default]
    Moderate,
    Active,
    VeryActive,
}

/// Nutrition goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    FatLoss,
    MuscleGain,
    #[default]
    Maintenance,
}

/// Preferred measurement system for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

/// Body and diet profile of the requesting user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub age: Option<u32>,
    /// Height in centimetres
    pub height: Option<f64>,
    /// Weight in kilograms
    pub weight: Option<f64>,
    pub gender: Option<String>,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
    /// Free-form restrictions such as `"vegetarian"` or `"gluten-free"`
    pub dietary_restrictions: BTreeSet<String>,
    pub allergies: BTreeSet<String>,
}

impl UserProfile {
    /// Returns true when the profile lists `restriction`.
    ///
    /// Matching ignores case and treats `-` and spaces as `_`, so `"Gluten-Free"`
    /// and `"gluten_free"` are the same restriction.
    #[must_use]
    pub fn has_restriction(&self, restriction: &str) -> bool {
        let wanted = normalize_restriction(restriction);
        self.dietary_restrictions
            .iter()
            .any(|r| normalize_restriction(r) == wanted)
    }
}

fn normalize_restriction(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '-' || c == ' ' { '_' } else { c })
        .collect()
}

/// Planning preferences of the requesting user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub budget_tier: Option<CostLevel>,
    pub preferred_cuisines: Vec<String>,
    pub unit_system: UnitSystem,
}
