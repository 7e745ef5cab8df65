//! Recipe lookup: search a recipe index, open a recipe, scale its
//! servings, collect ingredients into a shopping list and keep liked
//! recipes across sessions.
//!
//! The crate holds the models and the controllers that drive them; the
//! binary wires them to a Telegram chat.

pub mod api;
pub mod config;
pub mod controller;
pub mod db;
pub mod error;
pub mod ingredient;
pub mod likes;
pub mod list;
pub mod recipe;
pub mod search;
pub mod state;
pub mod view;

pub use api::{HttpRecipeApi, RecipeApi, RecipeDetail, RecipeSummary};
pub use controller::{App, Event};
pub use db::{MemoryStorage, SlotStorage, SqliteStorage};
pub use error::{AppError, AppResult, NetworkError};
pub use view::View;
