//! Core business logic - framework-agnostic planning and grocery operations.
//!
//! Nothing in here knows about HTTP; the `api` layer calls these functions and maps their
//! errors.

/// Meal catalog reads and seeding
pub mod catalog;
/// Bounded candidate query
pub mod candidates;
/// Cooking constraint profiles and the feasibility filter
pub mod constraints;
/// Cost estimate, pantry diff and budget alternatives
pub mod economics;
/// Grocery list aggregation and categorization
pub mod grocery;
/// Ingredient line parsing
pub mod ingredients;
/// Plan persistence and history
pub mod plan;
/// User profile and preference types
pub mod profile;
/// Best-effort external ranking
pub mod ranking;
/// Plan generation pipeline
pub mod recommend;
/// Weekly 7x4 assignment
pub mod schedule;
