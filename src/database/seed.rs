use serde::Serialize;
use tracing::info;

use super::manager::DatabaseError;
use super::postgres::PgStore;
use super::store::Store;

pub const SEED_EMAIL: &str = "admin@test.com";

/// Lists created for the seed user, each with a single item
const SEED_LISTS: &[(&str, &str)] = &[
    ("First list", "My first item"),
    ("secondary list", "My second item"),
];

#[derive(Debug, Serialize)]
pub struct SeedReport {
    pub user_id: String,
    pub email: String,
    pub lists: usize,
    pub items: usize,
}

/// Recreate the demo account from scratch. An existing account with the same email is
/// removed first, taking its lists and items with it.
pub async fn seed(store: &PgStore) -> Result<SeedReport, DatabaseError> {
    if store.delete_user_by_email(SEED_EMAIL).await? {
        info!("Removed existing seed user {}", SEED_EMAIL);
    }

    let user = store.create_user(SEED_EMAIL).await?;
    let mut items = 0;
    for (list_name, item_name) in SEED_LISTS {
        let list = store.create_list(list_name, &user.id).await?;
        store.create_item(item_name, &list.id).await?;
        items += 1;
    }

    info!("Seeded {} with {} lists", SEED_EMAIL, SEED_LISTS.len());
    Ok(SeedReport {
        user_id: user.id,
        email: user.email,
        lists: SEED_LISTS.len(),
        items,
    })
}
