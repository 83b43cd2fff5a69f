//! Catalog management service

use validator::Validate;

use crate::{
    config::CatalogConfig,
    error::{AppError, AppResult},
    models::{
        item::{Item, ItemChanges, NewItem},
        Deactivation,
    },
    repository::{ids, Repository},
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    item_prefix: char,
}

impl CatalogService {
    pub fn new(repository: Repository, config: &CatalogConfig) -> Self {
        Self {
            repository,
            item_prefix: config.item_prefix,
        }
    }

    /// Get item by ID
    pub fn get_item(&self, id: &str) -> AppResult<Item> {
        self.repository.items.get_by_id(id)
    }

    /// Add a new item under the next free id. It starts active only if quantity > 0.
    pub fn intake(&self, item: NewItem) -> AppResult<(String, Item)> {
        item.validate()?;

        let mut items = self.repository.items.load()?;
        let id = ids::next_item_id(self.item_prefix, &items)?;
        let record = Item::from(item);
        items.insert(id.clone(), record.clone());
        self.repository.items.save(&items)?;

        tracing::info!("Item {} added: '{}' x{}", id, record.title, record.quantity);
        Ok((id, record))
    }

    /// Update item fields; unset fields are left as they are
    pub fn update(&self, id: &str, changes: ItemChanges) -> AppResult<Item> {
        changes.validate()?;

        let mut items = self.repository.items.load()?;
        let item = items
            .get_mut(id)
            .ok_or_else(|| AppError::ItemNotFound(id.to_string()))?;
        changes.apply_to(item);
        let updated = item.clone();
        self.repository.items.save(&items)?;

        tracing::info!("Item {} updated", id);
        Ok(updated)
    }

    /// Logical delete; quantity is left as it is
    pub fn deactivate(&self, id: &str) -> AppResult<Deactivation> {
        let mut items = self.repository.items.load()?;
        let item = items
            .get_mut(id)
            .ok_or_else(|| AppError::ItemNotFound(id.to_string()))?;

        if !item.active {
            return Ok(Deactivation::AlreadyInactive);
        }
        item.active = false;
        self.repository.items.save(&items)?;

        tracing::info!("Item {} deactivated", id);
        Ok(Deactivation::Deactivated)
    }

    /// Active items in intake order
    pub fn list_active(&self) -> AppResult<Vec<(String, Item)>> {
        self.filter(|item| item.active)
    }

    /// Items with an author containing `author` (case-insensitive), active or not
    pub fn search_by_author(&self, author: &str) -> AppResult<Vec<(String, Item)>> {
        let needle = author.trim().to_lowercase();
        self.filter(|item| {
            item.authors
                .iter()
                .map(str::trim)
                .any(|a| !a.is_empty() && a.to_lowercase().contains(&needle))
        })
    }

    /// Active items whose category contains `category` (case-insensitive)
    pub fn search_by_category(&self, category: &str) -> AppResult<Vec<(String, Item)>> {
        let needle = category.trim().to_lowercase();
        self.filter(|item| item.active && item.category.to_lowercase().contains(&needle))
    }

    fn filter(&self, predicate: impl Fn(&Item) -> bool) -> AppResult<Vec<(String, Item)>> {
        Ok(self
            .repository
            .items
            .load()?
            .into_iter()
            .filter(|(_, item)| predicate(item))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::JsonStore;
    use tempfile::TempDir;

    fn service() -> (TempDir, CatalogService) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::in_dir(dir.path());
        store.ensure_collections().unwrap();
        (
            dir,
            CatalogService::new(Repository::new(store), &CatalogConfig::default()),
        )
    }

    fn new_item(title: &str, category: &str, author: &str, quantity: u32) -> NewItem {
        NewItem {
            title: title.into(),
            publisher: "Emecé".into(),
            category: category.into(),
            quantity,
            daily_rate: 50,
            author1: Some(author.into()),
            author2: None,
            author3: None,
        }
    }

    #[test]
    fn test_intake_allocates_ids() {
        let (_dir, svc) = service();
        let (id, item) = svc.intake(new_item("El Aleph", "Stories", "Borges", 3)).unwrap();
        assert_eq!(id, "L001");
        assert!(item.active);
        let (id, item) = svc.intake(new_item("Sobre héroes", "Novel", "Sabato", 0)).unwrap();
        assert_eq!(id, "L002");
        assert!(!item.active);
    }

    #[test]
    fn test_custom_prefix() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::in_dir(dir.path());
        store.ensure_collections().unwrap();
        let svc = CatalogService::new(Repository::new(store), &CatalogConfig { item_prefix: 'B' });
        assert_eq!(svc.intake(new_item("X", "Y", "Z", 1)).unwrap().0, "B001");
    }

    #[test]
    fn test_deactivate_keeps_quantity() {
        let (_dir, svc) = service();
        let (id, _) = svc.intake(new_item("El Aleph", "Stories", "Borges", 3)).unwrap();
        assert_eq!(svc.deactivate(&id).unwrap(), Deactivation::Deactivated);
        assert_eq!(svc.deactivate(&id).unwrap(), Deactivation::AlreadyInactive);
        let item = svc.get_item(&id).unwrap();
        assert!(!item.active);
        assert_eq!(item.quantity, 3);
        assert!(matches!(svc.deactivate("L999"), Err(AppError::ItemNotFound(_))));
    }

    #[test]
    fn test_searches() {
        let (_dir, svc) = service();
        svc.intake(new_item("El Aleph", "Short Stories", "Jorge Luis Borges", 3)).unwrap();
        svc.intake(new_item("Rayuela", "Novel", "Julio Cortázar", 1)).unwrap();
        let (inactive, _) = svc.intake(new_item("Ficciones", "Short Stories", "Borges", 1)).unwrap();
        svc.deactivate(&inactive).unwrap();

        let by_author: Vec<String> = svc.search_by_author("BORGES").unwrap().into_iter().map(|(id, _)| id).collect();
        assert_eq!(by_author, vec!["L001", "L003"]);

        let by_category: Vec<String> = svc.search_by_category("stories").unwrap().into_iter().map(|(id, _)| id).collect();
        assert_eq!(by_category, vec!["L001"]);

        assert_eq!(svc.list_active().unwrap().len(), 2);
    }

    #[test]
    fn test_update_with_tri_state_active() {
        let (_dir, svc) = service();
        let (id, _) = svc.intake(new_item("Rayuela", "Novel", "Cortázar", 0)).unwrap();
        let updated = svc
            .update(
                &id,
                ItemChanges {
                    quantity: Some(2),
                    active: Some(true),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(updated.active);
        assert_eq!(updated.quantity, 2);

        let unchanged = svc.update(&id, ItemChanges::default()).unwrap();
        assert_eq!(unchanged, updated);
    }
}
