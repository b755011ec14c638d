use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};

use super::fields::FieldErrors;
use crate::error::ApiError;

/// Where callers are sent after their list disappears
pub const LISTS_INDEX: &str = "/lists";

pub const UNSUPPORTED_ACTION: &str = "Unsupported action";

/// Result of running one dispatcher action
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// The action ran; the payload always carries `"ok": true`
    Success(Value),
    /// Required fields were missing or malformed; nothing was written
    ValidationError(FieldErrors),
    /// The target does not exist or belongs to someone else
    NotFound,
    Redirect(String),
    /// The `action` discriminator named nothing this dispatcher knows
    Unsupported,
    Unauthenticated,
}

impl ActionOutcome {
    pub fn ok() -> Self {
        ActionOutcome::Success(json!({ "ok": true }))
    }

    pub fn ok_with(key: &str, value: impl serde::Serialize) -> Self {
        let mut payload = json!({ "ok": true });
        match serde_json::to_value(value) {
            Ok(v) => payload[key] = v,
            Err(e) => tracing::error!("Failed to serialize {} payload: {}", key, e),
        }
        ActionOutcome::Success(payload)
    }

    pub fn redirect_to_index() -> Self {
        ActionOutcome::Redirect(LISTS_INDEX.to_string())
    }
}

impl IntoResponse for ActionOutcome {
    fn into_response(self) -> Response {
        match self {
            ActionOutcome::Success(data) => Json(json!({ "success": true, "data": data })).into_response(),
            ActionOutcome::ValidationError(errors) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "errors": errors })),
            )
                .into_response(),
            ActionOutcome::NotFound => ApiError::not_found("Not found").into_response(),
            ActionOutcome::Redirect(target) => redirect_response(target),
            ActionOutcome::Unsupported => {
                Json(json!({ "success": true, "message": UNSUPPORTED_ACTION })).into_response()
            }
            ActionOutcome::Unauthenticated => ApiError::unauthorized("Authentication required").into_response(),
        }
    }
}

/// Result of a loader: the requested data, or a reason it cannot be shown
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome<T> {
    Data(T),
    NotFound,
    Redirect(String),
}

/// 303 so browsers follow with a GET; the body repeats the target for API clients
pub(crate) fn redirect_response(target: String) -> Response {
    let body = Json(json!({ "success": true, "redirect": target }));
    match header::HeaderValue::from_str(&target) {
        Ok(location) => (StatusCode::SEE_OTHER, [(header::LOCATION, location)], body).into_response(),
        Err(_) => {
            tracing::error!("Refusing to redirect to invalid location {:?}", target);
            ApiError::internal_server_error("Invalid redirect target").into_response()
        }
    }
}
