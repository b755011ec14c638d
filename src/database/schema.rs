use sqlx::PgPool;
use tracing::info;

use super::manager::DatabaseError;

/// Table definitions, applied in order. Foreign keys cascade so deleting a user removes
/// its lists and deleting a list removes its items.
const SCHEMA: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            email       TEXT NOT NULL UNIQUE,
            created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    ),
    (
        "lists",
        r#"
        CREATE TABLE IF NOT EXISTS lists (
            id          TEXT PRIMARY KEY,
            name        TEXT NOT NULL CHECK (name <> ''),
            user_id     TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
            created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    ),
    (
        "lists_user_id_idx",
        "CREATE INDEX IF NOT EXISTS lists_user_id_idx ON lists (user_id)",
    ),
    (
        "items",
        r#"
        CREATE TABLE IF NOT EXISTS items (
            id          TEXT PRIMARY KEY,
            name        TEXT NOT NULL CHECK (name <> ''),
            list_id     TEXT NOT NULL REFERENCES lists (id) ON DELETE CASCADE,
            completed   BOOLEAN NOT NULL DEFAULT false,
            created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    ),
    (
        "items_list_id_idx",
        "CREATE INDEX IF NOT EXISTS items_list_id_idx ON items (list_id)",
    ),
];

/// Create any missing tables and indexes. Safe to run on every startup.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), DatabaseError> {
    for (name, ddl) in SCHEMA {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("creating {}: {}", name, e)))?;
    }
    info!("Database schema ready ({} statements)", SCHEMA.len());
    Ok(())
}
