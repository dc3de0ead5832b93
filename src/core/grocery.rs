//! Grocery aggregation - turns a stored plan into a categorized, priced shopping list.
//!
//! Every ingredient line of every slot is parsed, bucketed by (name, unit) and summed. Sums
//! are kept in integer thousandths of a unit so the list does not depend on the order the
//! slots were visited. Lists are recomputed on each request and never stored.

use crate::{
    config::settings::StoreConfig,
    core::{
        ingredients::{Unit, normalize_name, parse_ingredient},
        plan::{get_owned_plan, load_plan_meals},
    },
    entities::meal,
    errors::Result,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{debug, instrument};

/// Cheapest price an item is ever estimated at.
pub const MIN_ITEM_COST: f64 = 0.25;

/// Shopping aisle an item is filed under. Variants are declared alphabetically so the derived
/// ordering matches display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Bakery,
    Beverages,
    Condiments,
    Dairy,
    Frozen,
    Meat,
    Other,
    Pantry,
    Produce,
}

/// Keyword rules in priority order; the first category with a matching keyword wins.
const CATEGORY_RULES: &[(Category, &[&str])] = &[
    (Category::Frozen, &["frozen", "ice cream", "popsicle"]),
    (
        Category::Beverages,
        &["juice", "coffee", "tea", "soda", "wine", "beer", "water", "kombucha"],
    ),
    (
        Category::Condiments,
        &[
            "ketchup",
            "mustard",
            "mayonnaise",
            "mayo",
            "vinegar",
            "sauce",
            "salsa",
            "dressing",
            "relish",
            "sriracha",
        ],
    ),
    (
        Category::Bakery,
        &["bread", "bun", "bagel", "tortilla", "pita", "croissant", "roll", "naan", "baguette"],
    ),
    (
        Category::Pantry,
        &[
            "rice",
            "pasta",
            "spaghetti",
            "flour",
            "sugar",
            "oil",
            "bean",
            "lentil",
            "chickpea",
            "oat",
            "quinoa",
            "noodle",
            "cereal",
            "broth",
            "stock",
            "honey",
            "salt",
            "black pepper",
            "peanut butter",
            "spice",
            "cumin",
            "paprika",
            "cinnamon",
            "baking powder",
            "baking soda",
        ],
    ),
    (
        Category::Meat,
        &[
            "chicken", "beef", "pork", "turkey", "lamb", "bacon", "sausage", "ham", "steak",
            "fish", "salmon", "tuna", "shrimp", "cod", "tofu",
        ],
    ),
    (
        Category::Dairy,
        &["milk", "cheese", "butter", "yogurt", "cream", "egg", "paneer", "ghee"],
    ),
    (
        Category::Produce,
        &[
            "tomato", "onion", "garlic", "potato", "carrot", "lettuce", "spinach", "pepper",
            "cucumber", "apple", "banana", "lemon", "lime", "broccoli", "mushroom", "avocado",
            "celery", "ginger", "herb", "cilantro", "parsley", "basil", "berry", "berries",
            "zucchini", "cabbage", "kale", "orange", "fruit", "vegetable", "greens",
        ],
    ),
];

impl Category {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bakery => "Bakery",
            Self::Beverages => "Beverages",
            Self::Condiments => "Condiments",
            Self::Dairy => "Dairy",
            Self::Frozen => "Frozen",
            Self::Meat => "Meat",
            Self::Other => "Other",
            Self::Pantry => "Pantry",
            Self::Produce => "Produce",
        }
    }

    /// Price per reference unit used by the cost heuristic.
    #[must_use]
    pub const fn base_price(self) -> f64 {
        match self {
            Self::Produce | Self::Other => 2.00,
            Self::Dairy | Self::Beverages => 3.50,
            Self::Meat => 6.00,
            Self::Pantry => 2.50,
            Self::Condiments | Self::Bakery => 3.00,
            Self::Frozen => 4.00,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn keyword_matches(words: &[&str], keyword: &str) -> bool {
    if keyword.contains(' ') {
        let padded = format!(" {} ", words.join(" "));
        return padded.contains(&format!(" {keyword} "));
    }
    words.iter().any(|word| {
        word.strip_prefix(keyword)
            .is_some_and(|rest| rest.is_empty() || rest == "s" || rest == "es")
    })
}

/// Files an ingredient name under a category by whole-word keyword rules.
#[must_use]
pub fn categorize(name: &str) -> Category {
    let lowered = name.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    CATEGORY_RULES
        .iter()
        .find(|(_, keywords)| {
            keywords
                .iter()
                .any(|keyword| keyword_matches(&words, keyword))
        })
        .map_or(Category::Other, |(category, _)| *category)
}

/// Pounds-equivalent multiplier applied to a quantity before pricing.
#[must_use]
pub const fn unit_factor(unit: Unit) -> f64 {
    match unit {
        Unit::Pound => 1.0,
        Unit::Ounce => 0.0625,
        Unit::Kilogram => 2.2,
        Unit::Gram => 0.0022,
        Unit::Cup => 0.5,
        Unit::Tablespoon => 0.031_25,
        Unit::Teaspoon => 0.0104,
        _ => 0.5,
    }
}

pub(crate) fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Heuristic price: base price x quantity x unit factor, floored and rounded to cents.
#[must_use]
pub fn estimate_cost(category: Category, quantity: f64, unit: Unit) -> f64 {
    round_cents((category.base_price() * quantity * unit_factor(unit)).max(MIN_ITEM_COST))
}

/// One line of the shopping list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroceryItem {
    pub name: String,
    pub quantity: f64,
    pub unit: Unit,
    pub category: Category,
    pub estimated_cost: f64,
    /// Purchase state is client-side; always `false` here.
    pub purchased: bool,
}

/// Items of one category with their subtotal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroceryCategory {
    pub category: Category,
    pub items: Vec<GroceryItem>,
    pub subtotal: f64,
}

/// Shopping list for a stored plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroceryList {
    pub plan_id: i64,
    pub categories: Vec<GroceryCategory>,
    pub total_items: usize,
    pub total_cost: f64,
}

impl GroceryList {
    /// All items across categories, in display order.
    pub fn items(&self) -> impl Iterator<Item = &GroceryItem> {
        self.categories.iter().flat_map(|c| c.items.iter())
    }
}

const MILLIS: f64 = 1000.0;

/// Sums ingredient lines into priced items sorted by (category, name, unit).
#[must_use]
pub fn aggregate_ingredients<'a, I>(lines: I) -> Vec<GroceryItem>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut buckets: BTreeMap<(String, Unit), i64> = BTreeMap::new();
    for line in lines {
        let parsed = parse_ingredient(line);
        if parsed.name.is_empty() {
            continue;
        }
        #[allow(clippy::cast_possible_truncation)]
        let millis = (parsed.quantity * MILLIS).round() as i64;
        let total = buckets.entry((parsed.name, parsed.unit)).or_insert(0);
        *total = total.saturating_add(millis);
    }

    let mut items: Vec<GroceryItem> = buckets
        .into_iter()
        .map(|((name, unit), millis)| {
            #[allow(clippy::cast_precision_loss)]
            let quantity = millis as f64 / MILLIS;
            let category = categorize(&name);
            GroceryItem {
                estimated_cost: estimate_cost(category, quantity, unit),
                name,
                quantity,
                unit,
                category,
                purchased: false,
            }
        })
        .collect();

    items.sort_by(|a, b| {
        a.category
            .cmp(&b.category)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.unit.cmp(&b.unit))
    });
    items
}

/// Aggregates the ingredients of every slot meal. Repeated meals count once per slot.
#[must_use]
pub fn aggregate_meals(meals: &[meal::Model]) -> Vec<GroceryItem> {
    aggregate_ingredients(
        meals
            .iter()
            .flat_map(|m| m.ingredients.iter().map(String::as_str)),
    )
}

/// Groups sorted items into categories and totals them.
#[must_use]
pub fn group_items(plan_id: i64, items: Vec<GroceryItem>) -> GroceryList {
    let total_items = items.len();
    let total_cost = round_cents(items.iter().map(|i| i.estimated_cost).sum());

    let mut grouped: BTreeMap<Category, Vec<GroceryItem>> = BTreeMap::new();
    for item in items {
        grouped.entry(item.category).or_default().push(item);
    }

    let categories = grouped
        .into_iter()
        .map(|(category, items)| GroceryCategory {
            category,
            subtotal: round_cents(items.iter().map(|i| i.estimated_cost).sum()),
            items,
        })
        .collect();

    GroceryList {
        plan_id,
        categories,
        total_items,
        total_cost,
    }
}

/// Builds the shopping list for a plan owned by `user_id`.
///
/// # Errors
/// Returns `Error::PlanNotFound` for missing, deleted or foreign plans.
#[instrument(skip(db))]
pub async fn build_grocery_list(
    db: &DatabaseConnection,
    plan_id: i64,
    user_id: &str,
) -> Result<GroceryList> {
    let plan = get_owned_plan(db, plan_id, user_id).await?;
    let meals = load_plan_meals(db, plan.id).await?;
    let list = group_items(plan.id, aggregate_meals(&meals));
    debug!(
        "Grocery list for plan {} has {} items in {} categories",
        plan.id,
        list.total_items,
        list.categories.len()
    );
    Ok(list)
}

/// Item counts per category plus the overall total.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrocerySummary {
    pub total_items: usize,
    pub total_cost: f64,
    pub categories: BTreeMap<Category, usize>,
}

#[must_use]
pub fn summarize(list: &GroceryList) -> GrocerySummary {
    GrocerySummary {
        total_items: list.total_items,
        total_cost: list.total_cost,
        categories: list
            .categories
            .iter()
            .map(|c| (c.category, c.items.len()))
            .collect(),
    }
}

/// Acknowledgement for a purchase update. Nothing is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseReceipt {
    pub purchased: Vec<String>,
    pub unknown: Vec<String>,
    pub progress: String,
}

/// Echoes which of `items` are on the list. Purchase state stays with the client.
#[must_use]
pub fn mark_purchased(list: &GroceryList, items: &[String]) -> PurchaseReceipt {
    let on_list: BTreeSet<&str> = list.items().map(|i| i.name.as_str()).collect();
    let mut purchased = Vec::new();
    let mut unknown = Vec::new();
    for item in items {
        let name = normalize_name(item);
        if name.is_empty() {
            continue;
        }
        if on_list.contains(name.as_str()) {
            purchased.push(name);
        } else {
            unknown.push(name);
        }
    }
    let progress = format!(
        "{} of {} items marked as purchased",
        purchased.len(),
        list.total_items
    );
    PurchaseReceipt {
        purchased,
        unknown,
        progress,
    }
}

/// Stores to suggest for a shopping trip.
#[must_use]
pub fn store_suggestions(stores: &[StoreConfig]) -> Vec<StoreConfig> {
    stores.to_vec()
}
