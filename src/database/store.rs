use async_trait::async_trait;

use super::manager::DatabaseError;
use super::models::{Item, ItemWithOwner, List, ListWithItems, User};

/// Persistence gateway for lists and items.
///
/// Every operation touches a single entity and is atomic on its own. A missing row is
/// reported as `None` (or `false` for deletes), never as an error; errors are reserved
/// for the store itself failing.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    async fn create_list(&self, name: &str, user_id: &str) -> Result<List, DatabaseError>;

    /// Lists owned by `user_id`, oldest first, without items
    async fn get_lists_for_user(&self, user_id: &str) -> Result<Vec<List>, DatabaseError>;

    async fn get_list(&self, id: &str) -> Result<Option<ListWithItems>, DatabaseError>;

    /// Removes the list and, through the cascade, all of its items
    async fn delete_list(&self, id: &str) -> Result<bool, DatabaseError>;

    async fn create_item(&self, name: &str, list_id: &str) -> Result<Item, DatabaseError>;

    async fn get_item(&self, id: &str) -> Result<Option<ItemWithOwner>, DatabaseError>;

    async fn update_item_completed(&self, id: &str, completed: bool) -> Result<Option<Item>, DatabaseError>;

    async fn delete_item(&self, id: &str) -> Result<bool, DatabaseError>;

    /// Read-only user lookup used by authentication
    async fn find_user(&self, id: &str) -> Result<Option<User>, DatabaseError>;

    /// Connectivity probe for `/health`
    async fn health_check(&self) -> Result<(), DatabaseError>;

    /// Release underlying resources; called once on shutdown
    async fn close(&self) {}
}

/// Fresh opaque identifier for a new row
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
