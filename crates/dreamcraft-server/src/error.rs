//! JSON error responses.

use std::any::Any;
use std::fmt::Display;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::config::Environment;

/// Failures surfaced to API clients.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Route not found: {path}")]
    NotFound { path: String },

    /// `message` is already redacted for the current environment.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

const INTERNAL_ERROR: &str = "Something went wrong!";
const HIDDEN_MESSAGE: &str = "Internal server error";

impl ApiError {
    /// Log `err` and wrap it, keeping its text only where the environment allows.
    pub fn internal(environment: Environment, err: impl Display) -> Self {
        tracing::error!("Request failed: {}", err);
        let message = if environment.exposes_errors() {
            err.to_string()
        } else {
            HIDDEN_MESSAGE.to_string()
        };
        ApiError::Internal { message }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct BadRequestBody<'a> {
    error: &'a str,
}

#[derive(Serialize)]
struct NotFoundBody<'a> {
    error: &'static str,
    path: &'a str,
}

#[derive(Serialize)]
struct InternalBody<'a> {
    error: &'static str,
    message: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::BadRequest(error) => (status, Json(BadRequestBody { error })).into_response(),
            ApiError::NotFound { path } => (
                status,
                Json(NotFoundBody {
                    error: "Route not found",
                    path,
                }),
            )
                .into_response(),
            ApiError::Internal { message } => (
                status,
                Json(InternalBody {
                    error: INTERNAL_ERROR,
                    message,
                }),
            )
                .into_response(),
        }
    }
}

/// Turn a caught handler panic into the standard 500 body.
pub fn panic_response(environment: Environment, panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else {
        "handler panicked"
    };
    ApiError::internal(environment, detail).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::{json, Value};

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn bad_request_has_error_field() {
        let response = ApiError::BadRequest("Name and message are required".into()).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Name and message are required" })
        );
    }

    #[tokio::test]
    async fn not_found_echoes_path() {
        let response = ApiError::NotFound {
            path: "/api/nope?x=1".into(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Route not found", "path": "/api/nope?x=1" })
        );
    }

    #[tokio::test]
    async fn internal_hides_details_in_production() {
        let response = ApiError::internal(Environment::Production, "disk on fire").into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Something went wrong!", "message": "Internal server error" })
        );
    }

    #[tokio::test]
    async fn internal_shows_details_in_development() {
        let response = ApiError::internal(Environment::Development, "disk on fire").into_response();

        assert_eq!(body_json(response).await["message"], "disk on fire");
    }

    #[tokio::test]
    async fn panic_payloads_become_messages() {
        let response = panic_response(Environment::Development, Box::new("kaboom"));
        assert_eq!(body_json(response).await["message"], "kaboom");

        let response = panic_response(Environment::Development, Box::new(String::from("owned")));
        assert_eq!(body_json(response).await["message"], "owned");

        let response = panic_response(Environment::Development, Box::new(42_u8));
        assert_eq!(body_json(response).await["message"], "handler panicked");
    }
}
