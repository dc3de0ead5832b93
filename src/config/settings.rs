//! Application settings loaded from config.toml
//!
//! The TOML file configures the ranking service, the store suggestions shown next to
//! grocery lists, and an optional set of catalog meals used to seed an empty database.
//! Environment variables override the file for deployment-specific values.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Default HTTP listen address
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Default ranking request timeout in milliseconds
pub const DEFAULT_RANKING_TIMEOUT_MS: u64 = 15_000;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// External ranking service settings
    #[serde(default)]
    pub ranking: RankingConfig,
    /// Stores suggested alongside grocery lists
    #[serde(default = "default_stores")]
    pub stores: Vec<StoreConfig>,
    /// Meals to seed into the catalog
    #[serde(default)]
    pub meals: Vec<MealSeed>,
}

/// HTTP server settings
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. `"127.0.0.1:8080"`
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

/// External ranking service settings
#[derive(Debug, Deserialize, Clone)]
pub struct RankingConfig {
    /// Base URL of the ranking service; ranking is skipped when absent
    pub url: Option<String>,
    /// Request timeout in milliseconds
    #[serde(default = "default_ranking_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_ms: DEFAULT_RANKING_TIMEOUT_MS,
        }
    }
}

/// A store suggestion
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Store name
    pub name: String,
    /// Store kind such as `"fresh"`, `"supermarket"` or `"online"`
    #[serde(rename = "type", alias = "kind")]
    pub kind: String,
}

/// Configuration for a single seeded catalog meal
#[derive(Debug, Deserialize, Clone)]
pub struct MealSeed {
    pub name: String,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub meal_type: Option<String>,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    #[serde(default)]
    pub fiber: f64,
    #[serde(default)]
    pub sugar: f64,
    #[serde(default)]
    pub sodium: f64,
    #[serde(default)]
    pub glycemic_index: Option<f64>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub is_vegetarian: bool,
    #[serde(default)]
    pub is_vegan: bool,
    #[serde(default)]
    pub is_gluten_free: bool,
    #[serde(default)]
    pub is_dairy_free: bool,
    #[serde(default)]
    pub is_nut_free: bool,
    #[serde(default = "default_cost_level")]
    pub cost_level: String,
    pub cook_time: i32,
    #[serde(default = "default_skill_level")]
    pub skill_level: String,
    #[serde(default)]
    pub appliances: Vec<String>,
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

const fn default_ranking_timeout_ms() -> u64 {
    DEFAULT_RANKING_TIMEOUT_MS
}

fn default_cost_level() -> String {
    "medium".to_string()
}

fn default_skill_level() -> String {
    "beginner".to_string()
}

fn default_stores() -> Vec<StoreConfig> {
    [
        ("Local Vegetable Market", "fresh"),
        ("Neighborhood Supermarket", "supermarket"),
        ("Online Grocery App", "online"),
    ]
    .into_iter()
    .map(|(name, kind)| StoreConfig {
        name: name.to_string(),
        kind: kind.to_string(),
    })
    .collect()
}

impl AppConfig {
    /// Applies `BIND_ADDRESS` and `RANKING_SERVICE_URL` overrides from the environment.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(bind_address) = std::env::var("BIND_ADDRESS") {
            self.server.bind_address = bind_address;
        }
        if let Ok(url) = std::env::var("RANKING_SERVICE_URL") {
            if !url.trim().is_empty() {
                self.ranking.url = Some(url);
            }
        }
        self
    }
}

/// Parses application configuration from TOML text
///
/// # Errors
/// Returns `Error::Config` if the TOML syntax is invalid or required fields are missing.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads application configuration from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;
    parse_config(&contents)
}

/// Loads configuration from `MEAL_PLANNER_CONFIG` (default `./config.toml`).
///
/// A missing file is not an error; the defaults are used instead.
pub fn load_default_config() -> Result<AppConfig> {
    let path = std::env::var("MEAL_PLANNER_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let config = if Path::new(&path).exists() {
        debug!("Loading configuration from {}", path);
        load_config(&path)?
    } else {
        info!("No configuration file at {}, using defaults", path);
        AppConfig {
            stores: default_stores(),
            ..AppConfig::default()
        }
    };
    Ok(config.with_env_overrides())
}
