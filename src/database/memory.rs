use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::manager::DatabaseError;
use super::models::{Item, ItemWithOwner, List, ListWithItems, User};
use super::store::{new_id, Store};

#[derive(Default)]
struct MemoryState {
    users: Vec<User>,
    lists: Vec<List>,
    items: Vec<Item>,
    operations: usize,
    closed: bool,
}

/// In-process [`Store`] used by tests and `serve --memory`.
///
/// Rows live in insertion order, so listing order matches creation order the same way
/// the PostgreSQL store orders by `created_at`. Every list/item operation bumps an
/// operation counter; `find_user` and `health_check` belong to authentication and probing
/// and are not counted.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user with a caller-chosen id
    pub async fn insert_user(&self, id: &str, email: &str) -> User {
        let now = Utc::now();
        let user = User {
            id: id.to_string(),
            email: email.to_string(),
            created_at: now,
            updated_at: now,
        };
        let mut state = self.state.write().await;
        state.users.retain(|u| u.id != id);
        state.users.push(user.clone());
        user
    }

    pub async fn is_closed(&self) -> bool {
        self.state.read().await.closed
    }

    pub async fn call_count(&self) -> usize {
        self.state.read().await.operations
    }

    /// Items whose `list_id` matches, regardless of whether the list still exists
    pub async fn items_for_list(&self, list_id: &str) -> Vec<Item> {
        self.state
            .read()
            .await
            .items
            .iter()
            .filter(|item| item.list_id == list_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_list(&self, name: &str, user_id: &str) -> Result<List, DatabaseError> {
        let mut state = self.state.write().await;
        state.operations += 1;

        if !state.users.iter().any(|u| u.id == user_id) {
            return Err(DatabaseError::QueryError(format!(
                "lists.user_id references unknown user '{}'",
                user_id
            )));
        }

        let now = Utc::now();
        let list = List {
            id: new_id(),
            name: name.to_string(),
            user_id: user_id.to_string(),
            created_at: now,
            updated_at: now,
        };
        state.lists.push(list.clone());
        Ok(list)
    }

    async fn get_lists_for_user(&self, user_id: &str) -> Result<Vec<List>, DatabaseError> {
        let mut state = self.state.write().await;
        state.operations += 1;
        Ok(state.lists.iter().filter(|l| l.user_id == user_id).cloned().collect())
    }

    async fn get_list(&self, id: &str) -> Result<Option<ListWithItems>, DatabaseError> {
        let mut state = self.state.write().await;
        state.operations += 1;

        let Some(list) = state.lists.iter().find(|l| l.id == id).cloned() else {
            return Ok(None);
        };
        let items = state.items.iter().filter(|i| i.list_id == id).cloned().collect();
        Ok(Some(ListWithItems { list, items }))
    }

    async fn delete_list(&self, id: &str) -> Result<bool, DatabaseError> {
        let mut state = self.state.write().await;
        state.operations += 1;

        let before = state.lists.len();
        state.lists.retain(|l| l.id != id);
        let removed = state.lists.len() != before;
        if removed {
            state.items.retain(|i| i.list_id != id);
        }
        Ok(removed)
    }

    async fn create_item(&self, name: &str, list_id: &str) -> Result<Item, DatabaseError> {
        let mut state = self.state.write().await;
        state.operations += 1;

        if !state.lists.iter().any(|l| l.id == list_id) {
            return Err(DatabaseError::QueryError(format!(
                "items.list_id references unknown list '{}'",
                list_id
            )));
        }

        let now = Utc::now();
        let item = Item {
            id: new_id(),
            name: name.to_string(),
            list_id: list_id.to_string(),
            completed: false,
            created_at: now,
            updated_at: now,
        };
        state.items.push(item.clone());
        Ok(item)
    }

    async fn get_item(&self, id: &str) -> Result<Option<ItemWithOwner>, DatabaseError> {
        let mut state = self.state.write().await;
        state.operations += 1;

        let Some(item) = state.items.iter().find(|i| i.id == id).cloned() else {
            return Ok(None);
        };
        let owner_id = state
            .lists
            .iter()
            .find(|l| l.id == item.list_id)
            .map(|l| l.user_id.clone());
        Ok(owner_id.map(|owner_id| ItemWithOwner { item, owner_id }))
    }

    async fn update_item_completed(&self, id: &str, completed: bool) -> Result<Option<Item>, DatabaseError> {
        let mut state = self.state.write().await;
        state.operations += 1;

        Ok(state.items.iter_mut().find(|i| i.id == id).map(|item| {
            item.completed = completed;
            item.updated_at = Utc::now();
            item.clone()
        }))
    }

    async fn delete_item(&self, id: &str) -> Result<bool, DatabaseError> {
        let mut state = self.state.write().await;
        state.operations += 1;

        let before = state.items.len();
        state.items.retain(|i| i.id != id);
        Ok(state.items.len() != before)
    }

    async fn find_user(&self, id: &str) -> Result<Option<User>, DatabaseError> {
        Ok(self.state.read().await.users.iter().find(|u| u.id == id).cloned())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn close(&self) {
        self.state.write().await.closed = true;
    }
}
