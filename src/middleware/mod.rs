pub mod auth;
pub mod response;

pub use auth::require_user;
pub use response::ApiResponse;
