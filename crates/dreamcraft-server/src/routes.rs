//! HTTP routes.

use std::any::Any;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    handler::HandlerWithoutStateExt,
    http::{header, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::IntoResponse,
    routing::{any, get, get_service, post},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use dreamcraft_manifest::{scan, Manifest};

use crate::config::{Environment, ServerConfig};
use crate::error::{panic_response, ApiError};

/// Request bodies above this size are rejected.
const BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub timestamp: String,
}

#[derive(Debug, Deserialize)]
pub struct DataRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DataResponse {
    pub success: bool,
    pub data: DataRecord,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DataRecord {
    pub id: i64,
    pub name: String,
    pub message: String,
    pub timestamp: String,
}

/// Build the application router for `config`.
pub fn router(config: &ServerConfig) -> Router {
    let state = AppState {
        config: Arc::new(config.clone()),
    };

    let api = Router::new()
        .route("/favicon.ico", get(favicon))
        .route("/api/health", get(health))
        .route("/api/portfolio-images", get(portfolio_images))
        .route("/api/data", post(create_data))
        .route("/api", any(not_found))
        .route("/api/", any(not_found))
        .route("/api/{*rest}", any(not_found))
        .method_not_allowed_fallback(not_found);

    let app = match config.environment {
        Environment::Production => {
            // Only GET and HEAD reach the built site; everything else is a JSON 404.
            let index = config.dist_dir.join("index.html");
            let site = ServeDir::new(&config.dist_dir).fallback(ServeFile::new(index));
            api.fallback_service(get_service(site).fallback(not_found))
        }
        Environment::Development => api.fallback_service(
            ServeDir::new(&config.public_dir)
                .call_fallback_on_method_not_allowed(true)
                .fallback(not_found.into_service()),
        ),
    };

    with_layers(app.with_state(state), config)
}

/// Wrap `router` in the middleware every response goes through.
pub fn with_layers(router: Router, config: &ServerConfig) -> Router {
    let environment = config.environment;

    router
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(cors_layer(config))
        .layer(CatchPanicLayer::custom(
            move |panic: Box<dyn Any + Send + 'static>| panic_response(environment, panic),
        ))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .origins()
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin, "Invalid CORS origin in config; skipping");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static("x-requested-with"),
        ])
        .allow_credentials(true)
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "Server is running".to_string(),
        timestamp: now_iso(),
    })
}

/// Live scan of the portfolio directory, same rules as the generated manifest.
async fn portfolio_images(State(state): State<AppState>) -> Result<Json<Manifest>, ApiError> {
    let environment = state.config.environment;
    let root = state.config.portfolio_dir.clone();

    let summary = tokio::task::spawn_blocking(move || scan(&root))
        .await
        .map_err(|e| ApiError::internal(environment, e))?
        .map_err(|e| ApiError::internal(environment, e))?;

    Ok(Json(summary.manifest))
}

async fn create_data(
    payload: Result<Json<DataRequest>, JsonRejection>,
) -> Result<Json<DataResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let (Some(name), Some(message)) = (
        request.name.filter(|s| !s.is_empty()),
        request.message.filter(|s| !s.is_empty()),
    ) else {
        return Err(ApiError::BadRequest(
            "Name and message are required".to_string(),
        ));
    };

    Ok(Json(DataResponse {
        success: true,
        data: DataRecord {
            id: Utc::now().timestamp_millis(),
            name,
            message,
            timestamp: now_iso(),
        },
    }))
}

async fn not_found(uri: Uri) -> impl IntoResponse {
    let path = uri
        .path_and_query()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    ApiError::NotFound { path }
}
