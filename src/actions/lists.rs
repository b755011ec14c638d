use tracing::{debug, info, warn};

use super::fields::{FieldErrors, FieldSet};
use super::{ActionContext, ActionOutcome, Rejection};
use crate::database::manager::DatabaseError;
use crate::database::repository::ListRepository;

/// Actions accepted by `POST /lists`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListAction {
    Create { name: String, user_id: String },
    Delete { list_id: String },
}

impl ListAction {
    pub fn parse(fields: &FieldSet) -> Result<Self, Rejection> {
        let mut errors = FieldErrors::new();
        match fields.action() {
            Some("create") => {
                let name = errors.require(fields, "name");
                let user_id = errors.require(fields, "userId");
                match (name, user_id) {
                    (Some(name), Some(user_id)) => Ok(ListAction::Create {
                        name: name.to_string(),
                        user_id: user_id.to_string(),
                    }),
                    _ => Err(Rejection::Invalid(errors)),
                }
            }
            Some("delete") => match errors.require(fields, "listId") {
                Some(list_id) => Ok(ListAction::Delete {
                    list_id: list_id.to_string(),
                }),
                None => Err(Rejection::Invalid(errors)),
            },
            other => Err(Rejection::Unsupported(other.map(str::to_string))),
        }
    }
}

pub async fn dispatch(ctx: ActionContext<'_>, fields: &FieldSet) -> Result<ActionOutcome, DatabaseError> {
    match ListAction::parse(fields) {
        Ok(action) => run(ctx, action).await,
        Err(rejection) => Ok(rejection.into()),
    }
}

pub async fn run(ctx: ActionContext<'_>, action: ListAction) -> Result<ActionOutcome, DatabaseError> {
    let lists = ListRepository::new(ctx.store);
    debug!("User {} list action {:?}", ctx.user.id, action);

    match action {
        ListAction::Create { name, user_id } => {
            if ctx.policy.is_strict() && !ctx.owns(&user_id) {
                warn!("User {} tried to create a list for {}", ctx.user.id, user_id);
                return Ok(ActionOutcome::NotFound);
            }
            let list = lists.create(&name, &user_id).await?;
            info!("Created list {} for user {}", list.id, list.user_id);
            Ok(ActionOutcome::ok_with("list", list))
        }
        ListAction::Delete { list_id } => {
            match lists.by_id(&list_id).await? {
                Some(found) if ctx.owns(&found.list.user_id) => {}
                Some(_) => {
                    warn!("User {} denied delete of list {}", ctx.user.id, list_id);
                    return Ok(ActionOutcome::NotFound);
                }
                None => return Ok(ActionOutcome::NotFound),
            }

            if !lists.delete(&list_id).await? {
                return Ok(ActionOutcome::NotFound);
            }
            info!("Deleted list {}", list_id);
            Ok(ActionOutcome::redirect_to_index())
        }
    }
}
