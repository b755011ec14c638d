pub mod item;
pub mod list;
pub mod user;

pub use item::{Item, ItemWithOwner};
pub use list::{List, ListWithItems};
pub use user::User;
