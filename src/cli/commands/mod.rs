pub mod db;
pub mod health;
pub mod token;
pub mod user;

use std::future::Future;

use crate::config;
use crate::database::{schema, DatabaseManager, PgStore, Store};

/// Connect to the configured database with the schema in place
pub(crate) async fn connect_store() -> anyhow::Result<PgStore> {
    let pool = DatabaseManager::connect(&config::config().database).await?;
    schema::ensure_schema(&pool).await?;
    Ok(PgStore::new(pool))
}

/// Await `work`, then close `store` whatever the outcome
pub(crate) async fn close_after<T>(
    store: &dyn Store,
    work: impl Future<Output = anyhow::Result<T>>,
) -> anyhow::Result<T> {
    let result = work.await;
    store.close().await;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;

    #[tokio::test]
    async fn store_is_closed_when_work_fails() {
        let store = MemoryStore::new();

        let result = close_after(&store, async { Err::<(), _>(anyhow::anyhow!("no user with email x")) }).await;

        assert!(result.is_err());
        assert!(store.is_closed().await);
    }

    #[tokio::test]
    async fn store_is_closed_after_success() {
        let store = MemoryStore::new();

        let value = close_after(&store, async { Ok::<_, anyhow::Error>(7) }).await.unwrap();

        assert_eq!(value, 7);
        assert!(store.is_closed().await);
    }
}
