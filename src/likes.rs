use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::db::SlotStorage;
use crate::error::{AppError, AppResult};

/// Snapshot of a recipe taken when it was liked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Like {
    pub id: String,
    pub title: String,
    pub author: String,
    pub image: String,
}

/// Liked recipes, at most one per recipe id. Every mutation rewrites the
/// whole collection into its storage slot.
pub struct Likes {
    likes: Vec<Like>,
    storage: Arc<dyn SlotStorage>,
    slot: String,
}

impl Likes {
    pub fn new(storage: Arc<dyn SlotStorage>, slot: impl Into<String>) -> Self {
        Self {
            likes: Vec::new(),
            storage,
            slot: slot.into(),
        }
    }

    /// Loads the collection from `slot`. An absent, unreadable or corrupt
    /// slot yields an empty collection.
    pub fn restore(storage: Arc<dyn SlotStorage>, slot: impl Into<String>) -> Self {
        let mut likes = Self::new(storage, slot);
        match likes.read_storage() {
            Ok(Some(stored)) => likes.likes = stored,
            Ok(None) => log::debug!("No stored likes in slot {}", likes.slot),
            Err(e) => log::warn!("Ignoring stored likes in slot {}: {e}", likes.slot),
        }
        likes
    }

    fn read_storage(&self) -> AppResult<Option<Vec<Like>>> {
        let Some(raw) = self.storage.read(&self.slot)? else {
            return Ok(None);
        };
        let mut stored: Vec<Like> = serde_json::from_str(&raw)?;
        let mut seen = HashSet::new();
        stored.retain(|like| seen.insert(like.id.clone()));
        Ok(Some(stored))
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.likes)
            .map_err(AppError::from)
            .and_then(|raw| self.storage.write(&self.slot, &raw));
        if let Err(e) = result {
            log::warn!("Failed to persist likes to slot {}: {e}", self.slot);
        }
    }

    pub fn likes(&self) -> &[Like] {
        &self.likes
    }

    /// Adds a like, or refreshes the snapshot in place when `id` is
    /// already liked.
    pub fn add_like(
        &mut self,
        id: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        image: impl Into<String>,
    ) -> Like {
        let like = Like {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            image: image.into(),
        };
        match self.likes.iter_mut().find(|l| l.id == like.id) {
            Some(existing) => *existing = like.clone(),
            None => self.likes.push(like.clone()),
        }
        self.persist();
        like
    }

    pub fn delete_like(&mut self, id: &str) -> Option<Like> {
        let index = self.likes.iter().position(|l| l.id == id)?;
        let removed = self.likes.remove(index);
        self.persist();
        Some(removed)
    }

    pub fn is_liked(&self, id: &str) -> bool {
        self.likes.iter().any(|l| l.id == id)
    }

    pub fn num_likes(&self) -> usize {
        self.likes.len()
    }
}
