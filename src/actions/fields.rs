use std::collections::{BTreeMap, HashMap};

use axum::http::{header, HeaderMap};
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;

/// Reserved key selecting the sub-operation of a dispatcher
pub const ACTION_FIELD: &str = "action";

/// Flat, string-keyed, string-valued form submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    fields: HashMap<String, String>,
}

impl FieldSet {
    /// Decode a request body as either `application/x-www-form-urlencoded` (the default
    /// when no content type is sent) or a flat JSON object. JSON booleans and numbers are
    /// kept in their textual form; nested values are rejected.
    pub fn from_body(headers: &HeaderMap, body: &[u8]) -> Result<Self, ApiError> {
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or("").trim().to_ascii_lowercase());

        match content_type.as_deref() {
            None | Some("") | Some("application/x-www-form-urlencoded") => Ok(Self::from_urlencoded(body)),
            Some("application/json") => Self::from_json(body),
            Some(other) => Err(ApiError::unsupported_media_type(format!(
                "Unsupported content type '{}'",
                other
            ))),
        }
    }

    /// The first occurrence of a repeated key wins, as with a single-valued form read
    pub fn from_urlencoded(body: &[u8]) -> Self {
        let mut fields = HashMap::new();
        for (key, value) in url::form_urlencoded::parse(body).into_owned() {
            fields.entry(key).or_insert(value);
        }
        Self { fields }
    }

    pub fn from_json(body: &[u8]) -> Result<Self, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let value: Value =
            serde_json::from_slice(body).map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {}", e)))?;
        let Value::Object(map) = value else {
            return Err(ApiError::bad_request("Request body must be a JSON object"));
        };

        let mut fields = HashMap::with_capacity(map.len());
        for (key, value) in map {
            let text = match value {
                Value::String(s) => s,
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                Value::Null => continue,
                Value::Array(_) | Value::Object(_) => {
                    return Err(ApiError::bad_request(format!("Field '{}' must be a plain value", key)))
                }
            };
            fields.insert(key, text);
        }
        Ok(Self { fields })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Value of `key` when present and not blank
    pub fn present(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn action(&self) -> Option<&str> {
        self.present(ACTION_FIELD)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Per-field validation messages. Every checked field has an entry; satisfied fields
/// map to `None` (serialized as `null`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Option<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `field` as satisfied, or as failing with `message`
    pub fn record(&mut self, field: &str, failure: Option<String>) {
        self.0.insert(field.to_string(), failure);
    }

    /// Require a non-blank value, returning it when present
    pub fn require<'f>(&mut self, fields: &'f FieldSet, field: &str) -> Option<&'f str> {
        let value = fields.present(field);
        let failure = value.is_none().then(|| format!("{} is required", field));
        self.record(field, failure);
        value
    }

    /// Require a `"true"`/`"false"` value
    pub fn require_bool(&mut self, fields: &FieldSet, field: &str) -> Option<bool> {
        let parsed = match fields.present(field) {
            None => Err(format!("{} is required", field)),
            Some("true") => Ok(true),
            Some("false") => Ok(false),
            Some(_) => Err(format!("{} must be \"true\" or \"false\"", field)),
        };
        match parsed {
            Ok(value) => {
                self.record(field, None);
                Some(value)
            }
            Err(message) => {
                self.record(field, Some(message));
                None
            }
        }
    }

    pub fn has_errors(&self) -> bool {
        self.0.values().any(Option::is_some)
    }

    pub fn message(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(|m| m.as_deref())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }
}
