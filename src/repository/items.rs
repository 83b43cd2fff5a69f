//! Items collection

use crate::{
    error::{AppError, AppResult},
    models::item::Item,
};

use super::store::{Collection, JsonStore, Records};

#[derive(Clone)]
pub struct ItemsRepository {
    store: JsonStore,
}

impl ItemsRepository {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    pub fn load(&self) -> AppResult<Records<Item>> {
        self.store.load(Collection::Items)
    }

    pub fn save(&self, items: &Records<Item>) -> AppResult<()> {
        self.store.save(Collection::Items, items)
    }

    /// Get item by ID
    pub fn get_by_id(&self, id: &str) -> AppResult<Item> {
        self.load()?
            .shift_remove(id)
            .ok_or_else(|| AppError::ItemNotFound(id.to_string()))
    }
}
