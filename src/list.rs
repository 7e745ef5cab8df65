use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    pub id: String,
    pub count: Option<f64>,
    pub unit: String,
    pub ingredient: String,
}

/// Shopping list. Items keep insertion order and every id handed out is
/// fresh for the lifetime of the list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShoppingList {
    items: Vec<ListItem>,
}

impl ShoppingList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ListItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn add_item(
        &mut self,
        count: Option<f64>,
        unit: impl Into<String>,
        ingredient: impl Into<String>,
    ) -> ListItem {
        let item = ListItem {
            id: Uuid::new_v4().simple().to_string(),
            count,
            unit: unit.into(),
            ingredient: ingredient.into(),
        };
        self.items.push(item.clone());
        item
    }

    /// Removes the item, if present. A missing id is logged and ignored.
    pub fn delete_item(&mut self, id: &str) -> Option<ListItem> {
        match self.items.iter().position(|item| item.id == id) {
            Some(index) => Some(self.items.remove(index)),
            None => {
                log::warn!("Shopping list has no item {id}, nothing to delete");
                None
            }
        }
    }

    pub fn update_count(&mut self, id: &str, count: f64) -> AppResult<&ListItem> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| AppError::not_found("list item", id))?;
        item.count = Some(count);
        Ok(item)
    }
}
