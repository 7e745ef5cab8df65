use crate::api::{RecipeApi, RecipeDetail};
use crate::error::{AppError, AppResult};
use crate::ingredient::{parse_ingredient, Ingredient};

pub const DEFAULT_SERVINGS: u32 = 4;
const MINUTES_PER_PERIOD: u32 = 15;
const INGREDIENTS_PER_PERIOD: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServingsChange {
    Inc,
    Dec,
}

/// The recipe currently on display.
///
/// `ingredients` holds the counts parsed for `original_servings`; they are
/// never rewritten when the serving count changes. Display quantities come
/// from [`Recipe::scaled_ingredients`].
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub author: String,
    pub image: String,
    pub url: String,
    pub ingredients: Vec<Ingredient>,
    pub servings: u32,
    pub cooking_time: Option<u32>,
    pub time: u32,
    raw_ingredients: Vec<String>,
    server_servings: Option<u32>,
    original_servings: u32,
}

impl Recipe {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            author: String::new(),
            image: String::new(),
            url: String::new(),
            ingredients: Vec::new(),
            servings: DEFAULT_SERVINGS,
            cooking_time: None,
            time: 0,
            raw_ingredients: Vec::new(),
            server_servings: None,
            original_servings: DEFAULT_SERVINGS,
        }
    }

    /// Fetches the detail for `self.id`. Nothing is written unless the
    /// fetch succeeds.
    pub async fn load(&mut self, api: &dyn RecipeApi) -> AppResult<()> {
        let detail = api.recipe(&self.id).await?;
        self.apply(detail);
        Ok(())
    }

    pub fn apply(&mut self, detail: RecipeDetail) {
        self.title = detail.title;
        self.author = detail.author;
        self.image = detail.image;
        self.url = detail.url;
        self.raw_ingredients = detail.ingredients;
        self.server_servings = detail.servings;
        self.cooking_time = detail.cooking_time;

        self.parse_ingredients();
        self.calc_servings();
        self.calc_time();
    }

    pub fn parse_ingredients(&mut self) {
        self.ingredients = self
            .raw_ingredients
            .iter()
            .map(|line| parse_ingredient(line))
            .collect();
    }

    pub fn calc_servings(&mut self) {
        self.servings = self
            .server_servings
            .filter(|&s| s >= 1)
            .unwrap_or(DEFAULT_SERVINGS);
        self.original_servings = self.servings;
    }

    /// Server cooking time when known, otherwise 15 minutes for every three
    /// ingredients.
    pub fn calc_time(&mut self) {
        self.time = self.cooking_time.unwrap_or_else(|| {
            let periods = self.ingredients.len().div_ceil(INGREDIENTS_PER_PERIOD);
            periods as u32 * MINUTES_PER_PERIOD
        });
    }

    pub fn original_servings(&self) -> u32 {
        self.original_servings
    }

    pub fn can_decrease(&self) -> bool {
        self.servings > 1
    }

    pub fn update_servings(&mut self, change: ServingsChange) -> AppResult<u32> {
        match change {
            ServingsChange::Inc => self.servings += 1,
            ServingsChange::Dec if self.can_decrease() => self.servings -= 1,
            ServingsChange::Dec => {
                return Err(AppError::Validation(
                    "servings cannot go below 1".to_string(),
                ))
            }
        }
        Ok(self.servings)
    }

    pub fn scaled_ingredients(&self) -> Vec<Ingredient> {
        self.ingredients
            .iter()
            .map(|ing| Ingredient {
                count: ing.scaled_count(self.original_servings, self.servings),
                ..ing.clone()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn detail(ingredients: &[&str], servings: Option<u32>, cooking_time: Option<u32>) -> RecipeDetail {
        RecipeDetail {
            title: "Pancakes".into(),
            author: "Ann".into(),
            image: "img".into(),
            url: "url".into(),
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
            servings,
            cooking_time,
        }
    }

    fn loaded(ingredients: &[&str], servings: Option<u32>) -> Recipe {
        let mut recipe = Recipe::new("42");
        recipe.apply(detail(ingredients, servings, None));
        recipe
    }

    #[test]
    fn apply_parses_and_derives() {
        let recipe = loaded(&["1½ cups flour", "2 eggs", "salt"], Some(2));
        assert_eq!(recipe.ingredients.len(), 3);
        assert_eq!(recipe.ingredients[0].unit, "cup");
        assert_eq!(recipe.servings, 2);
        assert_eq!(recipe.time, 15);
    }

    #[test]
    fn fallback_servings_and_time() {
        let recipe = loaded(&["a", "b", "c", "d"], None);
        assert_eq!(recipe.servings, DEFAULT_SERVINGS);
        assert_eq!(recipe.time, 30);

        let recipe = loaded(&[], Some(0));
        assert_eq!(recipe.servings, DEFAULT_SERVINGS);
        assert_eq!(recipe.time, 0);

        let mut recipe = Recipe::new("1");
        recipe.apply(detail(&["a"], Some(3), Some(50)));
        assert_eq!(recipe.time, 50);
    }

    #[test]
    fn decrement_stops_at_one() {
        let mut recipe = loaded(&["1 cup milk"], Some(2));
        assert_eq!(recipe.update_servings(ServingsChange::Dec).unwrap(), 1);
        assert!(matches!(
            recipe.update_servings(ServingsChange::Dec),
            Err(AppError::Validation(_))
        ));
        assert_eq!(recipe.servings, 1);
        assert_eq!(recipe.update_servings(ServingsChange::Inc).unwrap(), 2);
    }

    #[test]
    fn scaling_leaves_parsed_counts_alone() {
        let mut recipe = loaded(&["2 cups flour", "salt to taste"], Some(4));
        let parsed = recipe.ingredients.clone();

        for _ in 0..4 {
            recipe.update_servings(ServingsChange::Inc).unwrap();
        }
        let scaled = recipe.scaled_ingredients();
        assert_eq!(scaled[0].count, Some(4.0));
        assert_eq!(scaled[1].count, None);
        assert_eq!(recipe.ingredients, parsed);

        for _ in 0..6 {
            recipe.update_servings(ServingsChange::Dec).unwrap();
        }
        assert_eq!(recipe.scaled_ingredients()[0].count, Some(1.0));
        assert_eq!(recipe.ingredients, parsed);
    }

    #[test]
    fn any_sequence_keeps_servings_positive() {
        let mut recipe = loaded(&["3 tbsp oil"], Some(3));
        let steps = [
            ServingsChange::Dec,
            ServingsChange::Dec,
            ServingsChange::Dec,
            ServingsChange::Dec,
            ServingsChange::Inc,
            ServingsChange::Dec,
            ServingsChange::Dec,
            ServingsChange::Inc,
            ServingsChange::Inc,
        ];
        for step in steps {
            let _ = recipe.update_servings(step);
            assert!(recipe.servings >= 1);
            let expected = 3.0 * f64::from(recipe.servings) / 3.0;
            assert_eq!(recipe.scaled_ingredients()[0].count, Some(expected));
        }
        assert_eq!(recipe.servings, 3);
    }
}
