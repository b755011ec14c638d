use tracing::{debug, info, warn};

use super::fields::{FieldErrors, FieldSet};
use super::{ActionContext, ActionOutcome, Rejection};
use crate::database::manager::DatabaseError;
use crate::database::models::ItemWithOwner;
use crate::database::repository::{ItemRepository, ListRepository};

/// Actions accepted by `POST /lists/:list_id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemAction {
    AddItem { name: String, list_id: String },
    /// `completed` is the value the caller last saw; the item ends up with its negation
    ToggleComplete { item_id: String, completed: bool },
    DeleteItem { item_id: String },
}

impl ItemAction {
    pub fn parse(fields: &FieldSet) -> Result<Self, Rejection> {
        let mut errors = FieldErrors::new();
        match fields.action() {
            Some("addItem") => {
                let name = errors.require(fields, "name");
                let list_id = errors.require(fields, "listId");
                match (name, list_id) {
                    (Some(name), Some(list_id)) => Ok(ItemAction::AddItem {
                        name: name.to_string(),
                        list_id: list_id.to_string(),
                    }),
                    _ => Err(Rejection::Invalid(errors)),
                }
            }
            Some("toggleComplete") => {
                let item_id = errors.require(fields, "itemId");
                let completed = errors.require_bool(fields, "completed");
                match (item_id, completed) {
                    (Some(item_id), Some(completed)) => Ok(ItemAction::ToggleComplete {
                        item_id: item_id.to_string(),
                        completed,
                    }),
                    _ => Err(Rejection::Invalid(errors)),
                }
            }
            Some("deleteItem") => match errors.require(fields, "itemId") {
                Some(item_id) => Ok(ItemAction::DeleteItem {
                    item_id: item_id.to_string(),
                }),
                None => Err(Rejection::Invalid(errors)),
            },
            other => Err(Rejection::Unsupported(other.map(str::to_string))),
        }
    }
}

pub async fn dispatch(ctx: ActionContext<'_>, fields: &FieldSet) -> Result<ActionOutcome, DatabaseError> {
    match ItemAction::parse(fields) {
        Ok(action) => run(ctx, action).await,
        Err(rejection) => Ok(rejection.into()),
    }
}

pub async fn run(ctx: ActionContext<'_>, action: ItemAction) -> Result<ActionOutcome, DatabaseError> {
    let items = ItemRepository::new(ctx.store);
    debug!("User {} item action {:?}", ctx.user.id, action);

    match action {
        ItemAction::AddItem { name, list_id } => {
            if ctx.policy.is_strict() {
                let owned = ListRepository::new(ctx.store)
                    .by_id(&list_id)
                    .await?
                    .is_some_and(|found| ctx.owns(&found.list.user_id));
                if !owned {
                    warn!("User {} denied adding to list {}", ctx.user.id, list_id);
                    return Ok(ActionOutcome::NotFound);
                }
            }
            let item = items.create(&name, &list_id).await?;
            info!("Added item {} to list {}", item.id, list_id);
            Ok(ActionOutcome::ok_with("item", item))
        }
        ItemAction::ToggleComplete { item_id, completed } => {
            if owned_item(ctx, &items, &item_id).await?.is_none() {
                return Ok(ActionOutcome::NotFound);
            }
            match items.toggle_completed(&item_id, completed).await? {
                Some(item) => Ok(ActionOutcome::ok_with("item", item)),
                None => Ok(ActionOutcome::NotFound),
            }
        }
        ItemAction::DeleteItem { item_id } => {
            if owned_item(ctx, &items, &item_id).await?.is_none() {
                return Ok(ActionOutcome::NotFound);
            }
            if !items.delete(&item_id).await? {
                return Ok(ActionOutcome::NotFound);
            }
            info!("Deleted item {}", item_id);
            Ok(ActionOutcome::ok())
        }
    }
}

/// Fetch the item only if the caller owns the list it belongs to
async fn owned_item(
    ctx: ActionContext<'_>,
    items: &ItemRepository<'_>,
    item_id: &str,
) -> Result<Option<ItemWithOwner>, DatabaseError> {
    match items.by_id(item_id).await? {
        Some(found) if ctx.owns(&found.owner_id) => Ok(Some(found)),
        Some(_) => {
            warn!("User {} denied access to item {}", ctx.user.id, item_id);
            Ok(None)
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::{fields, seed_list, store_with_users};
    use crate::config::OwnershipPolicy;
    use crate::database::store::Store;

    #[tokio::test]
    async fn missing_fields_never_reach_the_store() {
        let (store, alice, _) = store_with_users().await;
        let ctx = ActionContext::new(&store, &alice, OwnershipPolicy::Strict);

        let cases: &[(&[(&str, &str)], &str)] = &[
            (&[("action", "addItem"), ("listId", "l1")], "name"),
            (&[("action", "addItem"), ("name", "Milk")], "listId"),
            (&[("action", "toggleComplete"), ("completed", "false")], "itemId"),
            (&[("action", "toggleComplete"), ("itemId", "i1")], "completed"),
            (&[("action", "deleteItem")], "itemId"),
        ];

        for (pairs, missing) in cases {
            let outcome = dispatch(ctx, &fields(pairs)).await.unwrap();
            let ActionOutcome::ValidationError(errors) = outcome else {
                panic!("expected validation error for {}", missing);
            };
            assert!(errors.message(missing).is_some(), "no message for {}", missing);
        }
        assert_eq!(store.call_count().await, 0);
    }

    #[tokio::test]
    async fn completed_must_be_a_literal_bool() {
        let parsed = ItemAction::parse(&fields(&[
            ("action", "toggleComplete"),
            ("itemId", "i1"),
            ("completed", "TRUE"),
        ]));
        let Err(Rejection::Invalid(errors)) = parsed else {
            panic!("expected rejection");
        };
        assert!(errors.message("completed").is_some());
        assert_eq!(errors.message("itemId"), None);
    }

    #[tokio::test]
    async fn toggle_writes_the_negation() {
        let (store, alice, _) = store_with_users().await;
        let (_, ids) = seed_list(&store, &alice, "Groceries", &["Milk"]).await;
        let ctx = ActionContext::new(&store, &alice, OwnershipPolicy::Strict);

        let outcome = dispatch(
            ctx,
            &fields(&[("action", "toggleComplete"), ("itemId", ids[0].as_str()), ("completed", "false")]),
        )
        .await
        .unwrap();

        let ActionOutcome::Success(data) = outcome else {
            panic!("expected success");
        };
        assert_eq!(data["item"]["completed"], true);
        assert!(store.get_item(&ids[0]).await.unwrap().unwrap().item.completed);
    }

    #[tokio::test]
    async fn other_users_cannot_toggle_or_delete() {
        let (store, alice, bob) = store_with_users().await;
        let (_, ids) = seed_list(&store, &alice, "Private", &["Secret"]).await;
        let ctx = ActionContext::new(&store, &bob, OwnershipPolicy::Strict);
        let item_id = ids[0].as_str();

        let toggle = dispatch(
            ctx,
            &fields(&[("action", "toggleComplete"), ("itemId", item_id), ("completed", "false")]),
        )
        .await
        .unwrap();
        let delete = dispatch(ctx, &fields(&[("action", "deleteItem"), ("itemId", item_id)]))
            .await
            .unwrap();

        assert_eq!(toggle, ActionOutcome::NotFound);
        assert_eq!(delete, ActionOutcome::NotFound);
        let untouched = store.get_item(item_id).await.unwrap().unwrap();
        assert!(!untouched.item.completed);
    }

    #[tokio::test]
    async fn missing_items_look_like_foreign_items() {
        let (store, _, bob) = store_with_users().await;
        let ctx = ActionContext::new(&store, &bob, OwnershipPolicy::Strict);

        let outcome = dispatch(ctx, &fields(&[("action", "deleteItem"), ("itemId", "ghost")]))
            .await
            .unwrap();
        assert_eq!(outcome, ActionOutcome::NotFound);
    }

    #[tokio::test]
    async fn owner_can_delete_items() {
        let (store, alice, _) = store_with_users().await;
        let (list_id, ids) = seed_list(&store, &alice, "Groceries", &["Milk", "Eggs"]).await;
        let ctx = ActionContext::new(&store, &alice, OwnershipPolicy::Strict);

        let outcome = dispatch(ctx, &fields(&[("action", "deleteItem"), ("itemId", ids[0].as_str())]))
            .await
            .unwrap();

        assert_eq!(outcome, ActionOutcome::ok());
        let remaining = store.items_for_list(&list_id).await;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "Eggs");
    }

    #[tokio::test]
    async fn add_item_to_foreign_list_depends_on_policy() {
        let (store, alice, bob) = store_with_users().await;
        let (list_id, _) = seed_list(&store, &alice, "Private", &[]).await;
        let submitted = fields(&[("action", "addItem"), ("name", "Intruder"), ("listId", list_id.as_str())]);

        let strict = ActionContext::new(&store, &bob, OwnershipPolicy::Strict);
        assert_eq!(dispatch(strict, &submitted).await.unwrap(), ActionOutcome::NotFound);
        assert!(store.items_for_list(&list_id).await.is_empty());

        let legacy = ActionContext::new(&store, &bob, OwnershipPolicy::Legacy);
        assert!(matches!(dispatch(legacy, &submitted).await.unwrap(), ActionOutcome::Success(_)));
        assert_eq!(store.items_for_list(&list_id).await.len(), 1);
    }

    #[tokio::test]
    async fn unknown_action_is_unsupported() {
        let (store, alice, _) = store_with_users().await;
        let ctx = ActionContext::new(&store, &alice, OwnershipPolicy::Strict);

        let outcome = dispatch(ctx, &fields(&[("action", "archive"), ("itemId", "i1")]))
            .await
            .unwrap();
        assert_eq!(outcome, ActionOutcome::Unsupported);
        assert_eq!(store.call_count().await, 0);
    }
}
