//! Ingredient line parsing.
//!
//! Lines look like `"2 cups rice"`, `"1/2 lb ground beef"`, `".5 tsp salt"` or just
//! `"salt to taste"`. Parsing never fails: anything without a leading amount is one piece of
//! the whole (normalized) line.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest quantity a single line can contribute; bigger amounts are clamped.
pub const MAX_QUANTITY: f64 = 1_000_000.0;

/// Canonical measurement units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Pound,
    Ounce,
    Kilogram,
    Gram,
    Cup,
    Tablespoon,
    Teaspoon,
    Milliliter,
    Liter,
    Clove,
    Can,
    Slice,
    Piece,
    Pinch,
    Bunch,
}

impl Unit {
    /// Resolves a unit token such as `"lbs"` or `"Tbsp."`.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim_end_matches(['.', ',']).to_lowercase();
        let unit = match token.as_str() {
            "lb" | "lbs" | "pound" | "pounds" => Self::Pound,
            "oz" | "ounce" | "ounces" => Self::Ounce,
            "kg" | "kgs" | "kilogram" | "kilograms" => Self::Kilogram,
            "g" | "gram" | "grams" => Self::Gram,
            "cup" | "cups" => Self::Cup,
            "tbsp" | "tbs" | "tablespoon" | "tablespoons" => Self::Tablespoon,
            "tsp" | "teaspoon" | "teaspoons" => Self::Teaspoon,
            "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => Self::Milliliter,
            "l" | "liter" | "liters" | "litre" | "litres" => Self::Liter,
            "clove" | "cloves" => Self::Clove,
            "can" | "cans" => Self::Can,
            "slice" | "slices" => Self::Slice,
            "piece" | "pieces" | "pc" | "pcs" => Self::Piece,
            "pinch" | "pinches" => Self::Pinch,
            "bunch" | "bunches" => Self::Bunch,
            _ => return None,
        };
        Some(unit)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pound => "pound",
            Self::Ounce => "ounce",
            Self::Kilogram => "kilogram",
            Self::Gram => "gram",
            Self::Cup => "cup",
            Self::Tablespoon => "tablespoon",
            Self::Teaspoon => "teaspoon",
            Self::Milliliter => "milliliter",
            Self::Liter => "liter",
            Self::Clove => "clove",
            Self::Can => "can",
            Self::Slice => "slice",
            Self::Piece => "piece",
            Self::Pinch => "pinch",
            Self::Bunch => "bunch",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ingredient line split into amount, unit and name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedIngredient {
    pub name: String,
    pub quantity: f64,
    pub unit: Unit,
}

/// Lowercases and trims an ingredient or pantry name.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Parses `2`, `1.5`, `.5` or `1/2`. Signs, exponents and zero denominators are rejected.
fn parse_amount(token: &str) -> Option<f64> {
    if !token.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }
    if !token.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '/') {
        return None;
    }

    let value = match token.split_once('/') {
        Some((numerator, denominator)) => {
            let numerator: f64 = numerator.parse().ok()?;
            let denominator: f64 = denominator.parse().ok()?;
            if denominator == 0.0 {
                return None;
            }
            numerator / denominator
        }
        None => token.parse().ok()?,
    };
    value.is_finite().then_some(value)
}

/// Parses a free-text ingredient line.
#[must_use]
pub fn parse_ingredient(line: &str) -> ParsedIngredient {
    let whole = || ParsedIngredient {
        name: normalize_name(line),
        quantity: 1.0,
        unit: Unit::Piece,
    };

    let mut tokens = line.split_whitespace().peekable();
    let Some(mut quantity) = tokens.peek().and_then(|t| parse_amount(t)) else {
        return whole();
    };
    tokens.next();

    // Mixed numbers such as "1 1/2 cups".
    if let Some(fraction) = tokens
        .peek()
        .filter(|t| t.contains('/'))
        .and_then(|t| parse_amount(t))
    {
        quantity += fraction;
        tokens.next();
    }
    let quantity = quantity.min(MAX_QUANTITY);

    let unit = match tokens.peek().and_then(|t| Unit::parse(t)) {
        Some(unit) => {
            tokens.next();
            unit
        }
        None => Unit::Piece,
    };

    if tokens.peek().is_some_and(|t| t.eq_ignore_ascii_case("of")) {
        tokens.next();
    }

    let name = normalize_name(&tokens.collect::<Vec<_>>().join(" "));
    if name.is_empty() {
        return whole();
    }

    ParsedIngredient {
        name,
        quantity,
        unit,
    }
}
