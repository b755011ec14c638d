use axum::{
    body::Bytes,
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};

use super::{authenticate, authenticate_and_parse};
use crate::actions::{self, load_list, outcome::redirect_response, ActionContext, ActionOutcome, LoadOutcome};
use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::state::AppState;

/// GET /lists/:list_id - One list with its items and a completion summary
pub async fn get(State(state): State<AppState>, Path(list_id): Path<String>, headers: HeaderMap) -> Response {
    let user = match authenticate(&state, &headers).await {
        Ok(user) => user,
        Err(response) => return response,
    };

    let ctx = ActionContext::new(state.store.as_ref(), &user, state.policy());
    match load_list(ctx, &list_id).await {
        Ok(LoadOutcome::Data(page)) => ApiResponse::success(page).into_response(),
        Ok(LoadOutcome::NotFound) => ActionOutcome::NotFound.into_response(),
        Ok(LoadOutcome::Redirect(target)) => redirect_response(target),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// POST|DELETE /lists/:list_id - Item actions (`addItem`, `toggleComplete`, `deleteItem`).
///
/// The target list comes from the submitted `listId` field, not from the path.
pub async fn post(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let (user, fields) = match authenticate_and_parse(&state, &headers, body).await {
        Ok(parsed) => parsed,
        Err(response) => return response,
    };
    tracing::debug!("Item action submitted from list page {}", list_id);

    let ctx = ActionContext::new(state.store.as_ref(), &user, state.policy());
    match actions::items::dispatch(ctx, &fields).await {
        Ok(outcome) => outcome.into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
