//! Render port driven by the controllers, plus the text formatting shared
//! by text front-ends.

use crate::api::RecipeSummary;
use crate::ingredient::Ingredient;
use crate::likes::Like;
use crate::list::ListItem;
use crate::recipe::Recipe;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    SearchResults,
    Recipe,
}

/// Everything a front-end must draw. Implementations only consume
/// already-computed data and never call back into the controllers.
pub trait View {
    fn render_loader(&mut self, region: Region);
    fn clear_loader(&mut self);
    fn alert(&mut self, message: &str);

    fn clear_results(&mut self);
    fn render_results(&mut self, results: &[RecipeSummary], page: usize, num_pages: usize);
    fn highlight_selected(&mut self, id: &str);

    fn clear_recipe(&mut self);
    fn render_recipe(&mut self, recipe: &Recipe, liked: bool);
    fn update_servings_ingredients(&mut self, recipe: &Recipe);

    fn render_item(&mut self, item: &ListItem);
    fn delete_item(&mut self, id: &str);
    fn update_item(&mut self, item: &ListItem);

    fn toggle_like_btn(&mut self, liked: bool);
    fn toggle_like_menu(&mut self, num_likes: usize);
    fn render_like(&mut self, like: &Like);
    fn delete_like(&mut self, id: &str);
}

const TITLE_LIMIT: usize = 17;

/// Shortens a title on word boundaries to fit one result line.
pub fn limit_title(title: &str) -> String {
    if title.chars().count() <= TITLE_LIMIT {
        return title.to_string();
    }
    let mut kept = Vec::new();
    let mut len = 0;
    for word in title.split_whitespace() {
        if len + word.chars().count() > TITLE_LIMIT {
            break;
        }
        len += word.chars().count();
        kept.push(word);
    }
    if kept.is_empty() {
        let cut: String = title.chars().take(TITLE_LIMIT).collect();
        return format!("{cut} ...");
    }
    format!("{} ...", kept.join(" "))
}

/// Counts read best as short decimals: `1.5`, `0.33`, `2`.
pub fn format_count(count: Option<f64>) -> String {
    match count {
        None => "?".to_string(),
        Some(count) => {
            let rounded = (count * 100.0).round() / 100.0;
            let text = format!("{rounded:.2}");
            text.trim_end_matches('0').trim_end_matches('.').to_string()
        }
    }
}

pub fn format_ingredient(ingredient: &Ingredient) -> String {
    let mut parts = Vec::with_capacity(3);
    if ingredient.count.is_some() {
        parts.push(format_count(ingredient.count));
    }
    if !ingredient.unit.is_empty() {
        parts.push(ingredient.unit.clone());
    }
    if !ingredient.ingredient.is_empty() {
        parts.push(ingredient.ingredient.clone());
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_cut_on_words() {
        assert_eq!(limit_title("Pasta with tomato and basil"), "Pasta with tomato ...");
        assert_eq!(limit_title("Short one"), "Short one");
        assert_eq!(
            limit_title("Supercalifragilisticexpialidocious"),
            "Supercalifragilis ..."
        );
    }

    #[test]
    fn counts_drop_trailing_zeros() {
        assert_eq!(format_count(Some(2.0)), "2");
        assert_eq!(format_count(Some(1.5)), "1.5");
        assert_eq!(format_count(Some(1.0 / 3.0)), "0.33");
        assert_eq!(format_count(None), "?");
    }

    #[test]
    fn ingredient_lines() {
        let flour = Ingredient {
            count: Some(1.5),
            unit: "cup".into(),
            ingredient: "flour".into(),
        };
        assert_eq!(format_ingredient(&flour), "1.5 cup flour");
        let salt = Ingredient {
            count: None,
            unit: String::new(),
            ingredient: "salt to taste".into(),
        };
        assert_eq!(format_ingredient(&salt), "salt to taste");
    }
}
