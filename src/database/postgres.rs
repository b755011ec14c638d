use async_trait::async_trait;
use sqlx::PgPool;

use super::manager::{DatabaseError, DatabaseManager};
use super::models::{Item, ItemWithOwner, List, ListWithItems, User};
use super::store::{new_id, Store};

const LIST_COLUMNS: &str = "id, name, user_id, created_at, updated_at";
const ITEM_COLUMNS: &str = "id, name, list_id, completed, created_at, updated_at";

/// [`Store`] backed by PostgreSQL
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a user account. Only used by the admin tooling; the request path never
    /// creates users.
    pub async fn create_user(&self, email: &str) -> Result<User, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email) VALUES ($1, $2)
             RETURNING id, email, created_at, updated_at",
        )
        .bind(new_id())
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, created_at, updated_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Delete a user and, through the cascades, everything it owns
    pub async fn delete_user_by_email(&self, email: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM users WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_list(&self, name: &str, user_id: &str) -> Result<List, DatabaseError> {
        let sql = format!(
            "INSERT INTO lists (id, name, user_id) VALUES ($1, $2, $3) RETURNING {}",
            LIST_COLUMNS
        );
        let list = sqlx::query_as::<_, List>(&sql)
            .bind(new_id())
            .bind(name)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(list)
    }

    async fn get_lists_for_user(&self, user_id: &str) -> Result<Vec<List>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM lists WHERE user_id = $1 ORDER BY created_at, id",
            LIST_COLUMNS
        );
        let lists = sqlx::query_as::<_, List>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(lists)
    }

    async fn get_list(&self, id: &str) -> Result<Option<ListWithItems>, DatabaseError> {
        let sql = format!("SELECT {} FROM lists WHERE id = $1", LIST_COLUMNS);
        let Some(list) = sqlx::query_as::<_, List>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let sql = format!(
            "SELECT {} FROM items WHERE list_id = $1 ORDER BY created_at, id",
            ITEM_COLUMNS
        );
        let items = sqlx::query_as::<_, Item>(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

        Ok(Some(ListWithItems { list, items }))
    }

    async fn delete_list(&self, id: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM lists WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_item(&self, name: &str, list_id: &str) -> Result<Item, DatabaseError> {
        let sql = format!(
            "INSERT INTO items (id, name, list_id) VALUES ($1, $2, $3) RETURNING {}",
            ITEM_COLUMNS
        );
        let item = sqlx::query_as::<_, Item>(&sql)
            .bind(new_id())
            .bind(name)
            .bind(list_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(item)
    }

    async fn get_item(&self, id: &str) -> Result<Option<ItemWithOwner>, DatabaseError> {
        let item = sqlx::query_as::<_, ItemWithOwner>(
            "SELECT i.id, i.name, i.list_id, i.completed, i.created_at, i.updated_at,
                    l.user_id AS owner_id
             FROM items i
             JOIN lists l ON l.id = i.list_id
             WHERE i.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    async fn update_item_completed(&self, id: &str, completed: bool) -> Result<Option<Item>, DatabaseError> {
        let sql = format!(
            "UPDATE items SET completed = $2, updated_at = now() WHERE id = $1 RETURNING {}",
            ITEM_COLUMNS
        );
        let item = sqlx::query_as::<_, Item>(&sql)
            .bind(id)
            .bind(completed)
            .fetch_optional(&self.pool)
            .await?;
        Ok(item)
    }

    async fn delete_item(&self, id: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_user(&self, id: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }

    async fn close(&self) {
        DatabaseManager::close(&self.pool).await;
    }
}
