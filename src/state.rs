use crate::likes::Likes;
use crate::list::ShoppingList;
use crate::recipe::Recipe;
use crate::search::Search;

/// Tag of the most recently initiated fetch for one model. A completion
/// carrying an older tag has been superseded and must be dropped.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

/// At most one live instance of each model.
#[derive(Default)]
pub struct AppState {
    pub search: Option<Search>,
    pub recipe: Option<Recipe>,
    pub list: Option<ShoppingList>,
    pub likes: Option<Likes>,
    search_generation: Generation,
    recipe_generation: Generation,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_search(&mut self) -> Generation {
        self.search_generation = self.search_generation.next();
        self.search_generation
    }

    pub fn is_current_search(&self, generation: Generation) -> bool {
        self.search_generation == generation
    }

    pub fn begin_recipe(&mut self) -> Generation {
        self.recipe_generation = self.recipe_generation.next();
        self.recipe_generation
    }

    pub fn is_current_recipe(&self, generation: Generation) -> bool {
        self.recipe_generation == generation
    }

    pub fn is_liked(&self, id: &str) -> bool {
        self.likes.as_ref().is_some_and(|likes| likes.is_liked(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_generations_supersede_older() {
        let mut state = AppState::new();
        let first = state.begin_search();
        let second = state.begin_search();
        assert!(first < second);
        assert!(!state.is_current_search(first));
        assert!(state.is_current_search(second));
    }

    #[test]
    fn slots_are_tagged_independently() {
        let mut state = AppState::new();
        let search = state.begin_search();
        let recipe = state.begin_recipe();
        state.begin_recipe();
        assert!(state.is_current_search(search));
        assert!(!state.is_current_recipe(recipe));
    }

    #[test]
    fn nothing_is_liked_before_likes_exist() {
        assert!(!AppState::new().is_liked("1"));
    }
}
