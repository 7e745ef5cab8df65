//! Controllers: the only place where events, models and views meet.
//!
//! Every entry point takes one event to completion. The state lock is
//! never held across a fetch; instead each fetch is tagged with the
//! generation it was issued under and its completion is dropped when a
//! newer search or recipe load has started in the meantime.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::api::RecipeApi;
use crate::db::SlotStorage;
use crate::likes::Likes;
use crate::list::ShoppingList;
use crate::recipe::{Recipe, ServingsChange};
use crate::search::Search;
use crate::state::AppState;
use crate::view::{Region, View};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Load,
    Search(String),
    GoToPage(usize),
    Navigate(String),
    DecreaseServings,
    IncreaseServings,
    AddToList,
    ToggleLike,
    DeleteItem(String),
    UpdateCount(String, f64),
}

/// Strips a URL fragment down to the recipe id it carries.
pub fn fragment_id(fragment: &str) -> Option<&str> {
    let id = fragment.trim().trim_start_matches('#').trim();
    (!id.is_empty()).then_some(id)
}

pub struct App {
    api: Arc<dyn RecipeApi>,
    storage: Arc<dyn SlotStorage>,
    likes_slot: String,
    results_per_page: usize,
    state: Mutex<AppState>,
}

impl App {
    pub fn new(
        api: Arc<dyn RecipeApi>,
        storage: Arc<dyn SlotStorage>,
        likes_slot: impl Into<String>,
        results_per_page: usize,
    ) -> Self {
        Self {
            api,
            storage,
            likes_slot: likes_slot.into(),
            results_per_page: results_per_page.max(1),
            state: Mutex::new(AppState::new()),
        }
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.state.lock())
    }

    pub async fn dispatch<V: View>(&self, event: Event, view: &mut V) {
        log::debug!("Dispatching {event:?}");
        match event {
            Event::Load => self.control_load(view),
            Event::Search(query) => self.control_search(&query, view).await,
            Event::GoToPage(page) => self.control_page(page, view),
            Event::Navigate(fragment) => self.control_recipe(&fragment, view).await,
            Event::DecreaseServings => self.control_servings(ServingsChange::Dec, view),
            Event::IncreaseServings => self.control_servings(ServingsChange::Inc, view),
            Event::AddToList => self.control_list(view),
            Event::ToggleLike => self.control_like(view),
            Event::DeleteItem(id) => self.control_delete_item(&id, view),
            Event::UpdateCount(id, count) => self.control_update_count(&id, count, view),
        }
    }

    fn new_likes(&self) -> Likes {
        Likes::restore(self.storage.clone(), self.likes_slot.clone())
    }

    /// Restores persisted likes and draws the likes menu.
    pub fn control_load<V: View>(&self, view: &mut V) {
        let mut state = self.state.lock();
        let likes = state.likes.insert(self.new_likes());
        log::info!("Restored {} likes from {}", likes.num_likes(), self.likes_slot);

        view.toggle_like_menu(likes.num_likes());
        for like in likes.likes() {
            view.render_like(like);
        }
    }

    pub async fn control_search<V: View>(&self, query: &str, view: &mut V) {
        let query = query.trim();
        if query.is_empty() {
            log::debug!("Ignoring empty search");
            return;
        }

        let generation = self.state.lock().begin_search();
        view.clear_results();
        view.render_loader(Region::SearchResults);

        let mut search = Search::new(query);
        let outcome = search.search(self.api.as_ref()).await.map(|_| ());

        let mut state = self.state.lock();
        if !state.is_current_search(generation) {
            log::debug!("Dropping stale results for {query:?}");
            return;
        }
        view.clear_loader();

        match outcome {
            Ok(()) => {
                let num_pages = search.num_pages(self.results_per_page);
                view.render_results(search.paginate(1, self.results_per_page), 1, num_pages);
                state.search = Some(search);
            }
            Err(e) => {
                log::error!("Search for {query:?} failed: {e}");
                view.alert("Something went wrong with the search...");
            }
        }
    }

    /// Re-renders a page of the current results without fetching.
    pub fn control_page<V: View>(&self, page: usize, view: &mut V) {
        let state = self.state.lock();
        let Some(search) = state.search.as_ref() else {
            log::debug!("No search to paginate");
            return;
        };
        view.clear_results();
        view.render_results(
            search.paginate(page, self.results_per_page),
            page,
            search.num_pages(self.results_per_page),
        );
    }

    pub async fn control_recipe<V: View>(&self, fragment: &str, view: &mut V) {
        let Some(id) = fragment_id(fragment) else {
            log::debug!("Ignoring navigation without a recipe id");
            return;
        };

        let generation = {
            let mut state = self.state.lock();
            view.clear_recipe();
            view.render_loader(Region::Recipe);
            if state.search.is_some() {
                view.highlight_selected(id);
            }
            state.begin_recipe()
        };

        let mut recipe = Recipe::new(id);
        let outcome = recipe.load(self.api.as_ref()).await;

        let mut state = self.state.lock();
        if !state.is_current_recipe(generation) {
            log::debug!("Dropping stale recipe {id}");
            return;
        }
        view.clear_loader();

        match outcome {
            Ok(()) => {
                log::debug!("Loaded recipe {id} ({} ingredients)", recipe.ingredients.len());
                view.render_recipe(&recipe, state.is_liked(id));
                state.recipe = Some(recipe);
            }
            Err(e) => {
                log::error!("Loading recipe {id} failed: {e}");
                view.alert("Error processing recipe!");
                if let Some(previous) = state.recipe.as_ref() {
                    view.render_recipe(previous, state.is_liked(&previous.id));
                }
            }
        }
    }

    pub fn control_servings<V: View>(&self, change: ServingsChange, view: &mut V) {
        let mut state = self.state.lock();
        let Some(recipe) = state.recipe.as_mut() else {
            log::debug!("No recipe loaded, ignoring {change:?}");
            return;
        };
        if change == ServingsChange::Dec && !recipe.can_decrease() {
            log::debug!("Servings already at the minimum");
            return;
        }
        match recipe.update_servings(change) {
            Ok(_) => view.update_servings_ingredients(recipe),
            Err(e) => log::warn!("{e}"),
        }
    }

    /// Adds every ingredient of the current recipe, at the current serving
    /// size, to the shopping list.
    pub fn control_list<V: View>(&self, view: &mut V) {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let Some(recipe) = state.recipe.as_ref() else {
            log::debug!("No recipe loaded, nothing to add");
            return;
        };

        let list = state.list.get_or_insert_with(ShoppingList::new);
        for ingredient in recipe.scaled_ingredients() {
            let item = list.add_item(ingredient.count, ingredient.unit, ingredient.ingredient);
            view.render_item(&item);
        }
        log::debug!("Shopping list now holds {} items", list.len());
    }

    pub fn control_delete_item<V: View>(&self, id: &str, view: &mut V) {
        let mut state = self.state.lock();
        let Some(list) = state.list.as_mut() else {
            log::warn!("No shopping list, nothing to delete for {id}");
            return;
        };
        if list.delete_item(id).is_some() {
            view.delete_item(id);
        }
    }

    pub fn control_update_count<V: View>(&self, id: &str, count: f64, view: &mut V) {
        if !count.is_finite() || count < 0.0 {
            log::warn!("Rejecting count {count} for item {id}");
            return;
        }
        let mut state = self.state.lock();
        let Some(list) = state.list.as_mut() else {
            log::warn!("No shopping list, cannot update {id}");
            return;
        };
        match list.update_count(id, count) {
            Ok(item) => view.update_item(item),
            Err(e) => log::warn!("{e}"),
        }
    }

    /// Toggles the like for the current recipe. Model and button/menu are
    /// updated under one lock.
    pub fn control_like<V: View>(&self, view: &mut V) {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let Some(recipe) = state.recipe.as_ref() else {
            log::debug!("No recipe loaded, nothing to like");
            return;
        };

        let likes = state.likes.get_or_insert_with(|| self.new_likes());
        if likes.is_liked(&recipe.id) {
            likes.delete_like(&recipe.id);
            view.toggle_like_btn(false);
            view.delete_like(&recipe.id);
        } else {
            let like = likes.add_like(
                recipe.id.clone(),
                recipe.title.clone(),
                recipe.author.clone(),
                recipe.image.clone(),
            );
            view.toggle_like_btn(true);
            view.render_like(&like);
        }
        view.toggle_like_menu(likes.num_likes());
    }
}
