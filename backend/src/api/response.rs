//! Uniform response envelope
//!
//! Every endpoint answers with `{ "code": .., "data": .., "msg": .. }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

/// Message carried by every successful response
pub const SUCCESS_MSG: &str = "success";

/// The `{code, data, msg}` envelope shared by all endpoints
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// 200 on success, 400 on validation failure, 500 on store failure
    pub code: u16,
    /// Endpoint-specific payload
    pub data: T,
    /// `"success"` or a human-readable error
    pub msg: String,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap a payload in a success envelope
    pub fn success(data: T) -> Self {
        Self {
            code: StatusCode::OK.as_u16(),
            data,
            msg: SUCCESS_MSG.to_string(),
        }
    }
}

impl ApiResponse<Value> {
    /// Error envelope with an empty data array
    pub fn failure(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            code: status.as_u16(),
            data: Value::Array(Vec::new()),
            msg: msg.into(),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
