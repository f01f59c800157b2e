/// JSON response helpers shared by all route handlers
use crate::errors::ValidationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;

/// 200 with `data` as the JSON body
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// `{ "error": { code, message, details, timestamp } }`
pub fn error_response(
    status: StatusCode,
    code: &str,
    message: &str,
    details: Option<&str>,
) -> Response {
    let body = json!({
        "error": {
            "code": code,
            "message": message,
            "details": details,
            "timestamp": Utc::now().to_rfc3339(),
        }
    });
    (status, Json(body)).into_response()
}

/// 400 `{ "title", "status", "errors": { field: [messages] } }`
pub fn validation_response(errors: &ValidationError) -> Response {
    let body = json!({
        "title": "One or more validation errors occurred.",
        "status": StatusCode::BAD_REQUEST.as_u16(),
        "errors": errors.errors,
    });
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}
