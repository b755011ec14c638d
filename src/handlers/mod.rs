// handlers/mod.rs - HTTP surface
//
// Public:    GET /, GET /health
// Protected: GET|POST /lists, GET|POST|DELETE /lists/:list_id (bearer JWT)
//
// Protected handlers authenticate inside the handler rather than in a layer so that
// authentication and body parsing can run side by side.

pub mod list;
pub mod lists;
pub mod system;

use axum::{
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use axum::body::Bytes;

use crate::actions::{ActionOutcome, FieldSet};
use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::require_user;
use crate::state::AppState;

/// Authenticate the caller and decode the submitted fields concurrently.
///
/// An authentication failure wins over a malformed body, so unauthenticated callers
/// never learn anything about how their submission would have been validated.
pub(crate) async fn authenticate_and_parse(
    state: &AppState,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<(User, FieldSet), Response> {
    let (user, fields) = futures::join!(
        require_user(state.store.as_ref(), &state.security, headers),
        async { FieldSet::from_body(headers, &body) }
    );

    let user = user.map_err(rejected_caller)?;
    let fields = fields.map_err(IntoResponse::into_response)?;
    Ok((user, fields))
}

pub(crate) async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<User, Response> {
    require_user(state.store.as_ref(), &state.security, headers)
        .await
        .map_err(rejected_caller)
}

fn rejected_caller(err: ApiError) -> Response {
    match err {
        ApiError::Unauthorized(_) => ActionOutcome::Unauthenticated.into_response(),
        other => other.into_response(),
    }
}
