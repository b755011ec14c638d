//! Request dispatch for lists and items.
//!
//! Each dispatcher turns a [`FieldSet`] into a typed action, checks that the caller owns
//! whatever the action touches, runs it through the repositories, and reports an
//! [`ActionOutcome`]. Validation and ownership failures are outcomes; only store failures
//! surface as errors.

pub mod fields;
pub mod items;
pub mod lists;
pub mod loaders;
pub mod outcome;

pub use fields::{FieldErrors, FieldSet};
pub use items::ItemAction;
pub use lists::ListAction;
pub use loaders::{load_list, load_lists, ListPage, ListsPage};
pub use outcome::{ActionOutcome, LoadOutcome, LISTS_INDEX};

use crate::config::OwnershipPolicy;
use crate::database::models::User;
use crate::database::store::Store;

/// Everything an action needs besides its fields
#[derive(Clone, Copy)]
pub struct ActionContext<'a> {
    pub store: &'a dyn Store,
    pub user: &'a User,
    pub policy: OwnershipPolicy,
}

impl<'a> ActionContext<'a> {
    pub fn new(store: &'a dyn Store, user: &'a User, policy: OwnershipPolicy) -> Self {
        Self { store, user, policy }
    }

    pub fn owns(&self, owner_id: &str) -> bool {
        self.user.id == owner_id
    }
}

/// Why a field-set could not become a typed action
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    Invalid(FieldErrors),
    Unsupported(Option<String>),
}

impl From<Rejection> for ActionOutcome {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::Invalid(errors) => ActionOutcome::ValidationError(errors),
            Rejection::Unsupported(action) => {
                tracing::debug!("Unsupported action {:?}", action);
                ActionOutcome::Unsupported
            }
        }
    }
}
