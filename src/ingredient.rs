//! Turns freeform ingredient lines ("1½ cups flour") into structured
//! `{count, unit, ingredient}` triples.
//!
//! Units are collapsed onto a canonical short form and counts accept
//! decimals, plain fractions, mixed numbers and unicode vulgar fractions.
//! Lines without a leading count keep `count = None` and their full text.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub count: Option<f64>,
    pub unit: String,
    pub ingredient: String,
}

impl Ingredient {
    /// Count for `current` servings of a recipe parsed for `original`.
    pub fn scaled_count(&self, original: u32, current: u32) -> Option<f64> {
        self.count.map(|count| scale(count, original, current))
    }
}

pub fn scale(count: f64, original: u32, current: u32) -> f64 {
    if original == 0 {
        return count;
    }
    count * f64::from(current) / f64::from(original)
}

static UNITS: &[(&str, &str)] = &[
    ("tablespoons", "tbsp"),
    ("tablespoon", "tbsp"),
    ("tbsps", "tbsp"),
    ("tbsp", "tbsp"),
    ("tbs", "tbsp"),
    ("tbl", "tbsp"),
    ("teaspoons", "tsp"),
    ("teaspoon", "tsp"),
    ("tsps", "tsp"),
    ("tsp", "tsp"),
    ("ounces", "oz"),
    ("ounce", "oz"),
    ("oz", "oz"),
    ("cups", "cup"),
    ("cup", "cup"),
    ("pounds", "pound"),
    ("pound", "pound"),
    ("lbs", "pound"),
    ("lb", "pound"),
    ("kilograms", "kg"),
    ("kilogram", "kg"),
    ("kg", "kg"),
    ("grams", "g"),
    ("gram", "g"),
    ("g", "g"),
    ("milliliters", "ml"),
    ("millilitres", "ml"),
    ("ml", "ml"),
    ("liters", "l"),
    ("litres", "l"),
    ("liter", "l"),
    ("litre", "l"),
    ("pinches", "pinch"),
    ("pinch", "pinch"),
];

static VULGAR_FRACTIONS: &[(char, f64)] = &[
    ('½', 1.0 / 2.0),
    ('⅓', 1.0 / 3.0),
    ('⅔', 2.0 / 3.0),
    ('¼', 1.0 / 4.0),
    ('¾', 3.0 / 4.0),
    ('⅕', 1.0 / 5.0),
    ('⅖', 2.0 / 5.0),
    ('⅗', 3.0 / 5.0),
    ('⅘', 4.0 / 5.0),
    ('⅙', 1.0 / 6.0),
    ('⅚', 5.0 / 6.0),
    ('⅐', 1.0 / 7.0),
    ('⅛', 1.0 / 8.0),
    ('⅜', 3.0 / 8.0),
    ('⅝', 5.0 / 8.0),
    ('⅞', 7.0 / 8.0),
    ('⅑', 1.0 / 9.0),
    ('⅒', 1.0 / 10.0),
];

fn parenthesised() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\([^)]*\)").expect("static pattern"))
}

/// Canonical short form of a unit word, tolerating a trailing `.` or `,`.
pub fn canonical_unit(word: &str) -> Option<&'static str> {
    let word = word.trim_end_matches(['.', ',']).to_lowercase();
    UNITS
        .iter()
        .find(|(variant, _)| *variant == word)
        .map(|(_, canonical)| *canonical)
}

fn decimal(token: &str) -> Option<f64> {
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    token.parse().ok()
}

fn vulgar(c: char) -> Option<f64> {
    VULGAR_FRACTIONS
        .iter()
        .find(|(symbol, _)| *symbol == c)
        .map(|(_, value)| *value)
}

fn fraction(token: &str) -> Option<f64> {
    let (num, den) = token.split_once('/')?;
    let den = decimal(den)?;
    if den == 0.0 {
        return None;
    }
    Some(decimal(num)? / den)
}

/// Converts one count token to a decimal: `2`, `0.5`, `1/2`, `½`, `1½`
/// and hyphenated mixed numbers like `1-1/2`. Ranges such as `2-3` keep
/// their lower bound.
pub fn parse_quantity(token: &str) -> Option<f64> {
    let token = token.trim_end_matches([',', '.']);

    if let Some((left, right)) = token.split_once('-') {
        let whole = parse_quantity(left)?;
        let rest = parse_quantity(right)?;
        return Some(if rest < 1.0 { whole + rest } else { whole });
    }

    if let Some(value) = decimal(token).or_else(|| fraction(token)) {
        return Some(value);
    }

    let last = token.chars().last()?;
    let part = vulgar(last)?;
    let whole = &token[..token.len() - last.len_utf8()];
    if whole.is_empty() {
        Some(part)
    } else {
        decimal(whole).map(|whole| whole + part)
    }
}

pub fn parse_ingredient(line: &str) -> Ingredient {
    let cleaned = parenthesised().replace_all(line, " ").to_lowercase();
    let tokens: Vec<&str> = cleaned.split_whitespace().collect();

    let Some(first) = tokens.first().and_then(|t| parse_quantity(t)) else {
        return Ingredient {
            count: None,
            unit: String::new(),
            ingredient: line.trim().to_string(),
        };
    };

    let mut count = first;
    let mut rest = &tokens[1..];
    if let Some(part) = rest.first().and_then(|t| parse_quantity(t)) {
        if part < 1.0 {
            count += part;
            rest = &rest[1..];
        }
    }

    let unit = match rest.first().and_then(|t| canonical_unit(t)) {
        Some(unit) => {
            rest = &rest[1..];
            unit.to_string()
        }
        None => String::new(),
    };

    Ingredient {
        count: Some(count),
        unit,
        ingredient: rest.join(" "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ing(count: Option<f64>, unit: &str, ingredient: &str) -> Ingredient {
        Ingredient {
            count,
            unit: unit.to_string(),
            ingredient: ingredient.to_string(),
        }
    }

    #[test]
    fn mixed_unicode_fraction_with_unit() {
        assert_eq!(
            parse_ingredient("1½ cups flour"),
            ing(Some(1.5), "cup", "flour")
        );
    }

    #[test]
    fn spelled_out_mixed_number() {
        assert_eq!(
            parse_ingredient("1 1/2 Tablespoons sugar"),
            ing(Some(1.5), "tbsp", "sugar")
        );
        assert_eq!(
            parse_ingredient("1-1/3 cup milk"),
            ing(Some(1.0 + 1.0 / 3.0), "cup", "milk")
        );
    }

    #[test]
    fn unit_variants_collapse() {
        for word in ["tablespoons", "Tablespoon", "tbsp.", "TBS"] {
            assert_eq!(canonical_unit(word), Some("tbsp"), "{word}");
        }
        assert_eq!(canonical_unit("ounces,"), Some("oz"));
        assert_eq!(canonical_unit("onion"), None);
    }

    #[test]
    fn count_without_unit() {
        assert_eq!(parse_ingredient("2 eggs"), ing(Some(2.0), "", "eggs"));
    }

    #[test]
    fn parenthesised_notes_are_dropped() {
        assert_eq!(
            parse_ingredient("1 (8 ounce) package cream cheese"),
            ing(Some(1.0), "", "package cream cheese")
        );
    }

    #[test]
    fn unrecognised_lines_keep_full_text() {
        assert_eq!(
            parse_ingredient("  Salt and Pepper to taste "),
            ing(None, "", "Salt and Pepper to taste")
        );
    }

    #[test]
    fn quantity_forms() {
        assert_eq!(parse_quantity("½"), Some(0.5));
        assert_eq!(parse_quantity("2¼"), Some(2.25));
        assert_eq!(parse_quantity("0.75"), Some(0.75));
        assert_eq!(parse_quantity("3/4"), Some(0.75));
        assert_eq!(parse_quantity("2-3"), Some(2.0));
        assert_eq!(parse_quantity("1/0"), None);
        assert_eq!(parse_quantity("nan"), None);
        assert_eq!(parse_quantity("a½"), None);
    }

    #[test]
    fn scaling_is_proportional() {
        let flour = ing(Some(1.5), "cup", "flour");
        assert_eq!(flour.scaled_count(4, 8), Some(3.0));
        assert_eq!(flour.scaled_count(4, 2), Some(0.75));
        assert_eq!(ing(None, "", "salt").scaled_count(4, 8), None);
    }
}
