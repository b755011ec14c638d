use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};

use super::{authenticate, authenticate_and_parse};
use crate::actions::{self, load_lists, ActionContext};
use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::state::AppState;

/// GET /lists - The caller and every list they own (without items)
pub async fn get(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let user = match authenticate(&state, &headers).await {
        Ok(user) => user,
        Err(response) => return response,
    };

    match load_lists(state.store.as_ref(), &user).await {
        Ok(page) => ApiResponse::success(page).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// POST /lists - List actions selected by the `action` field (`create`, `delete`)
pub async fn post(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let (user, fields) = match authenticate_and_parse(&state, &headers, body).await {
        Ok(parsed) => parsed,
        Err(response) => return response,
    };

    let ctx = ActionContext::new(state.store.as_ref(), &user, state.policy());
    match actions::lists::dispatch(ctx, &fields).await {
        Ok(outcome) => outcome.into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
