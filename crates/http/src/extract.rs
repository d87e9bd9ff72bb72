//! Request body extraction that leaves field rules to the handlers

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde_json::{Map, Value};

use crate::AppError;

/// A request body parsed as a JSON object.
///
/// Field types are not checked here, so handlers can report every bad field
/// at once. An empty body reads as `{}` and no `Content-Type` is required.
/// Bodies that are not JSON, or not an object, are rejected with 400.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonObject(pub Map<String, Value>);

impl JsonObject {
    pub fn parse(bytes: &[u8]) -> Result<Self, AppError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        match serde_json::from_slice(bytes) {
            Ok(Value::Object(fields)) => Ok(Self(fields)),
            Ok(_) => Err(AppError::bad_request("request body must be a JSON object")),
            Err(err) => Err(AppError::bad_request(format!("malformed JSON body: {err}"))),
        }
    }

    /// Text of a scalar field, the way form validators see it.
    ///
    /// Absent and `null` fields are `None`. Numbers and booleans are
    /// stringified. Arrays and objects carry no text and read as empty.
    pub fn text(&self, field: &str) -> Option<String> {
        match self.0.get(field)? {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            Value::Bool(flag) => Some(flag.to_string()),
            Value::Array(_) | Value::Object(_) => Some(String::new()),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }
}

impl<S> FromRequest<S> for JsonObject
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
        Self::parse(&bytes)
    }
}
