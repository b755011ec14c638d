use crate::database::manager::DatabaseError;
use crate::database::models::{Item, ItemWithOwner, List, ListWithItems};
use crate::database::store::Store;

/// List access scoped to one store handle. No business rules live here: callers are
/// expected to have validated input and checked ownership already.
pub struct ListRepository<'a> {
    store: &'a dyn Store,
}

impl<'a> ListRepository<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    pub async fn create(&self, name: &str, user_id: &str) -> Result<List, DatabaseError> {
        self.store.create_list(name, user_id).await
    }

    pub async fn for_user(&self, user_id: &str) -> Result<Vec<List>, DatabaseError> {
        self.store.get_lists_for_user(user_id).await
    }

    pub async fn by_id(&self, id: &str) -> Result<Option<ListWithItems>, DatabaseError> {
        self.store.get_list(id).await
    }

    pub async fn delete(&self, id: &str) -> Result<bool, DatabaseError> {
        self.store.delete_list(id).await
    }
}

pub struct ItemRepository<'a> {
    store: &'a dyn Store,
}

impl<'a> ItemRepository<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    pub async fn create(&self, name: &str, list_id: &str) -> Result<Item, DatabaseError> {
        self.store.create_item(name, list_id).await
    }

    pub async fn by_id(&self, id: &str) -> Result<Option<ItemWithOwner>, DatabaseError> {
        self.store.get_item(id).await
    }

    /// Write the negation of `current`.
    ///
    /// `current` is whatever the caller last read; nothing re-reads the row, so two
    /// toggles carrying the same stale value both write the same result.
    pub async fn toggle_completed(&self, id: &str, current: bool) -> Result<Option<Item>, DatabaseError> {
        self.store.update_item_completed(id, !current).await
    }

    pub async fn delete(&self, id: &str) -> Result<bool, DatabaseError> {
        self.store.delete_item(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;

    async fn store_with_item() -> (MemoryStore, Item) {
        let store = MemoryStore::new();
        store.insert_user("u1", "u1@example.com").await;
        let list = ListRepository::new(&store).create("Groceries", "u1").await.unwrap();
        let item = ItemRepository::new(&store).create("Milk", &list.id).await.unwrap();
        (store, item)
    }

    #[tokio::test]
    async fn created_list_is_listed_for_its_owner_only() {
        let store = MemoryStore::new();
        store.insert_user("u1", "u1@example.com").await;
        store.insert_user("u2", "u2@example.com").await;
        let lists = ListRepository::new(&store);

        let created = lists.create("Groceries", "u1").await.unwrap();

        assert_eq!(lists.for_user("u1").await.unwrap(), vec![created]);
        assert!(lists.for_user("u2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn new_items_start_incomplete() {
        let (_store, item) = store_with_item().await;
        assert!(!item.completed);
    }

    #[tokio::test]
    async fn toggling_twice_restores_the_original_value() {
        let (store, item) = store_with_item().await;
        let items = ItemRepository::new(&store);

        let first = items.toggle_completed(&item.id, item.completed).await.unwrap().unwrap();
        assert!(first.completed);
        let second = items.toggle_completed(&item.id, first.completed).await.unwrap().unwrap();
        assert_eq!(second.completed, item.completed);
    }

    #[tokio::test]
    async fn stale_toggles_collapse_into_one_write() {
        // Two clients read `completed = false` and both toggle. The second write does not
        // see the first, so the item ends up completed instead of back where it started.
        let (store, item) = store_with_item().await;
        let items = ItemRepository::new(&store);

        items.toggle_completed(&item.id, false).await.unwrap();
        items.toggle_completed(&item.id, false).await.unwrap();

        let current = items.by_id(&item.id).await.unwrap().unwrap();
        assert!(current.item.completed);
    }
}
