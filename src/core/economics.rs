//! Cost estimate, pantry diff and cheaper alternatives for a grocery list.
//!
//! Everything here is a pure function of a [`GroceryList`]; prices are the deterministic
//! heuristic from `core::grocery`, not market data.

use crate::core::{
    grocery::{Category, GroceryItem, GroceryList, round_cents},
    ingredients::normalize_name,
};
use serde::Serialize;
use std::collections::HashSet;

/// Totals below this are a low budget week.
pub const LOW_BUDGET_LIMIT: f64 = 75.0;
/// Totals above this are a high budget week.
pub const HIGH_BUDGET_LIMIT: f64 = 150.0;
/// Alternatives are only looked for above this item cost.
pub const ALTERNATIVE_MIN_COST: f64 = 3.0;
/// Items above this cost fall back to a store-brand suggestion.
pub const STORE_BRAND_MIN_COST: f64 = 5.0;
/// Suggestions saving less than this are dropped.
pub const MIN_SAVINGS: f64 = 0.50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetLevel {
    Low,
    Medium,
    High,
}

impl BudgetLevel {
    #[must_use]
    pub fn for_total(total: f64) -> Self {
        if total < LOW_BUDGET_LIMIT {
            Self::Low
        } else if total <= HIGH_BUDGET_LIMIT {
            Self::Medium
        } else {
            Self::High
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCost {
    pub category: Category,
    pub item_count: usize,
    pub subtotal: f64,
}

/// Weekly cost breakdown of a plan's grocery list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimate {
    pub plan_id: i64,
    pub categories: Vec<CategoryCost>,
    pub total_cost: f64,
    pub budget_level: BudgetLevel,
}

#[must_use]
pub fn estimate_cost(list: &GroceryList) -> CostEstimate {
    CostEstimate {
        plan_id: list.plan_id,
        categories: list
            .categories
            .iter()
            .map(|c| CategoryCost {
                category: c.category,
                item_count: c.items.len(),
                subtotal: c.subtotal,
            })
            .collect(),
        total_cost: list.total_cost,
        budget_level: BudgetLevel::for_total(list.total_cost),
    }
}

/// How urgently a missing item should be bought.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    #[must_use]
    pub fn for_item(item: &GroceryItem) -> Self {
        match item.category {
            Category::Meat | Category::Dairy => Self::High,
            Category::Produce => Self::Medium,
            _ if item.estimated_cost > STORE_BRAND_MIN_COST => Self::Medium,
            _ => Self::Low,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingItem {
    #[serde(flatten)]
    pub item: GroceryItem,
    pub priority: Priority,
}

/// Items on the list that are not in the pantry, most urgent first.
///
/// Pantry entries are compared after lowercasing and trimming; blank entries are ignored.
/// Items of equal priority keep their list order.
#[must_use]
pub fn missing_items(list: &GroceryList, pantry: &[String]) -> Vec<MissingItem> {
    let pantry: HashSet<String> = pantry
        .iter()
        .map(|p| normalize_name(p))
        .filter(|p| !p.is_empty())
        .collect();

    let mut missing: Vec<MissingItem> = list
        .items()
        .filter(|item| !pantry.contains(&item.name))
        .map(|item| MissingItem {
            priority: Priority::for_item(item),
            item: item.clone(),
        })
        .collect();
    missing.sort_by(|a, b| b.priority.cmp(&a.priority));
    missing
}

/// A cheaper substitute for one list item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAlternative {
    pub original: String,
    pub alternative: String,
    pub category: Category,
    pub original_cost: f64,
    pub alternative_cost: f64,
    pub savings: f64,
}

const CHEESE_BRANDS: &[&str] = &[
    "kraft",
    "tillamook",
    "cabot",
    "sargento",
    "philadelphia",
    "boursin",
    "president",
    "babybel",
    "velveeta",
];

fn words(name: &str) -> Vec<&str> {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect()
}

fn without_words(name: &str, drop: &[&str]) -> String {
    words(name)
        .into_iter()
        .filter(|w| !drop.contains(w))
        .collect::<Vec<_>>()
        .join(" ")
}

/// First matching substitution rule as (suggested name, fraction saved).
fn substitution(item: &GroceryItem) -> Option<(String, f64)> {
    let name = item.name.as_str();
    let tokens = words(name);
    let has = |word: &str| tokens.contains(&word);

    if has("organic") {
        return Some((format!("Conventional {}", without_words(name, &["organic"])), 0.30));
    }
    if has("beef") {
        return Some(("Ground turkey".to_string(), 0.25));
    }
    if has("salmon") {
        return Some(("Canned salmon".to_string(), 0.40));
    }
    if has("cheese") && CHEESE_BRANDS.iter().any(|brand| tokens.contains(brand)) {
        return Some((
            format!("Store-brand {}", without_words(name, CHEESE_BRANDS)),
            0.20,
        ));
    }
    if item.estimated_cost > STORE_BRAND_MIN_COST {
        return Some((format!("Store-brand {name}"), 0.15));
    }
    None
}

/// Cheaper substitutes for expensive items, largest savings first.
#[must_use]
pub fn budget_alternatives(list: &GroceryList) -> Vec<BudgetAlternative> {
    let mut alternatives: Vec<BudgetAlternative> = list
        .items()
        .filter(|item| item.estimated_cost > ALTERNATIVE_MIN_COST)
        .filter_map(|item| {
            let (alternative, fraction) = substitution(item)?;
            let savings = round_cents(item.estimated_cost * fraction);
            (savings >= MIN_SAVINGS).then(|| BudgetAlternative {
                original: item.name.clone(),
                alternative,
                category: item.category,
                original_cost: item.estimated_cost,
                alternative_cost: round_cents(item.estimated_cost - savings),
                savings,
            })
        })
        .collect();
    alternatives.sort_by(|a, b| b.savings.total_cmp(&a.savings));
    alternatives
}
