use serde::Serialize;
use tracing::warn;

use super::{ActionContext, LoadOutcome, LISTS_INDEX};
use crate::config::OwnershipPolicy;
use crate::database::manager::DatabaseError;
use crate::database::models::{List, ListWithItems, User};
use crate::database::repository::ListRepository;
use crate::database::store::Store;

/// Data behind `GET /lists`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListsPage {
    pub user: User,
    pub lists: Vec<List>,
}

/// Data behind `GET /lists/:list_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListPage {
    pub list: ListWithItems,
    pub summary: ListSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListSummary {
    pub total: usize,
    pub completed: usize,
    pub remaining: usize,
}

impl From<&ListWithItems> for ListSummary {
    fn from(list: &ListWithItems) -> Self {
        let (remaining, completed) = list.partition();
        Self {
            total: list.items.len(),
            completed: completed.len(),
            remaining: remaining.len(),
        }
    }
}

pub async fn load_lists(store: &dyn Store, user: &User) -> Result<ListsPage, DatabaseError> {
    let lists = ListRepository::new(store).for_user(&user.id).await?;
    Ok(ListsPage {
        user: user.clone(),
        lists,
    })
}

/// A missing list is always `NotFound`. A list owned by someone else is `NotFound` under
/// the strict policy and a redirect to the index under the legacy one.
pub async fn load_list(ctx: ActionContext<'_>, list_id: &str) -> Result<LoadOutcome<ListPage>, DatabaseError> {
    let Some(list) = ListRepository::new(ctx.store).by_id(list_id).await? else {
        return Ok(LoadOutcome::NotFound);
    };

    if !ctx.owns(&list.list.user_id) {
        warn!("User {} denied view of list {}", ctx.user.id, list_id);
        return Ok(match ctx.policy {
            OwnershipPolicy::Strict => LoadOutcome::NotFound,
            OwnershipPolicy::Legacy => LoadOutcome::Redirect(LISTS_INDEX.to_string()),
        });
    }

    let summary = ListSummary::from(&list);
    Ok(LoadOutcome::Data(ListPage { list, summary }))
}
