//! Unified error types for the meal planner.
//!
//! Every fallible operation in the crate returns [`Result`]. The HTTP layer maps these
//! variants onto status codes in `api::error`; nothing below the API layer knows about HTTP.

use thiserror::Error;

/// All errors that can be surfaced by the meal planner.
#[derive(Debug, Error)]
pub enum Error {
    /// The catalog query (active meals + diet flags + budget tier) returned no rows.
    #[error("No meals available for your preferences")]
    NoCandidates,

    /// Candidates existed, but every one of them violated the user's cooking constraints.
    #[error("No meals match your real-world constraints")]
    NoFeasibleMeals,

    /// The referenced plan does not exist, is soft-deleted, or belongs to another user.
    #[error("Meal plan not found: {id}")]
    PlanNotFound {
        /// Plan identifier as supplied by the caller
        id: String,
    },

    /// The user has not stored a constraint profile.
    #[error("Constraints not set yet")]
    ConstraintsNotFound,

    /// The caller supplied a malformed value.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Description of what was wrong
        message: String,
    },

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// A persisted plan refers to a meal that no longer exists in the catalog.
    #[error("Meal {meal_id} referenced by plan {plan_id} is missing from the catalog")]
    DanglingMeal {
        /// Plan holding the reference
        plan_id: i64,
        /// Missing meal id
        meal_id: i64,
    },

    /// Database error from `SeaORM`.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// JSON encoding or decoding failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error (config files, listener binding).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required environment variable was missing or not unicode.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Integer conversion overflowed.
    #[error("Integer conversion error: {0}")]
    TryFromInt(#[from] std::num::TryFromIntError),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
