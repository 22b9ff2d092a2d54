// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Application state, route handlers, and router construction.
//!
//! This module is `pub` so that integration tests can build a test router directly
//! without starting the full binary.

use crate::error::ScanError;
use crate::models::crawler::{CrawlerIdentity, CrawlerVerdict};
use crate::models::scan::{
    CheckId, CheckResult, CheckStatus, ErrorResponse, Insight, InsightKind, Recommendation,
    ScanMode, ScanRequest, ScanResult,
};
use crate::models::version::VersionResponse;
use crate::services::scanner::Scanner;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application version extracted from `Cargo.toml` at compile time.
/// The patch segment can be overridden via `BOTCHECK_PATCH_VERSION` (see `build.rs`).
pub const VERSION: &str = env!("BOTCHECK_VERSION");

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Shared application state injected into every route handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub scanner: Arc<Scanner>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

impl IntoResponse for ScanError {
    fn into_response(self) -> Response {
        let status = match self {
            ScanError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ScanError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/version",
    responses((status = 200, description = "Service name and version", body = VersionResponse))
)]
pub async fn version_handler() -> Json<VersionResponse> {
    Json(VersionResponse {
        agent: "botcheck".to_string(),
        version: VERSION.to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/api/crawlers",
    responses((status = 200, description = "Crawlers every scan is evaluated against", body = [CrawlerIdentity]))
)]
pub async fn crawlers_handler(State(state): State<AppState>) -> Json<Vec<CrawlerIdentity>> {
    Json(state.scanner.catalog().crawlers().to_vec())
}

#[utoipa::path(
    post,
    path = "/api/scan",
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Scan completed", body = ScanResult),
        (status = 400, description = "Missing or invalid url or mode", body = ErrorResponse),
        (status = 500, description = "Scan failed unexpectedly", body = ErrorResponse)
    )
)]
pub async fn scan_handler(
    State(state): State<AppState>,
    payload: Result<Json<ScanRequest>, JsonRejection>,
) -> Result<Json<ScanResult>, ScanError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected scan request body");
        ScanError::InvalidRequest(rejection.body_text())
    })?;

    state.scanner.scan(&request).await.map(Json)
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(version_handler, crawlers_handler, scan_handler),
    components(schemas(
        VersionResponse,
        ScanRequest,
        ScanResult,
        ScanMode,
        CheckId,
        CheckResult,
        CheckStatus,
        Recommendation,
        Insight,
        InsightKind,
        CrawlerIdentity,
        CrawlerVerdict,
        ErrorResponse
    )),
    info(title = "BotCheck", description = "AI crawler accessibility scanner")
)]
pub struct ApiDoc;

/// Build the Axum application router, including the Swagger UI.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/version", get(version_handler))
        .route("/api/crawlers", get(crawlers_handler))
        .route("/api/scan", post(scan_handler))
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::crawler::CrawlerCatalog;
    use crate::models::settings::ScannerSettings;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn create_test_app() -> Router {
        let catalog = Arc::new(CrawlerCatalog::builtin().unwrap());
        let scanner = Scanner::new(&ScannerSettings::default(), catalog).unwrap();
        create_router(AppState {
            scanner: Arc::new(scanner),
        })
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn scan_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/scan")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_version_endpoint_response() {
        let response = create_test_app()
            .oneshot(Request::builder().uri("/version").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );

        let json = body_json(response).await;
        assert_eq!(json["agent"], "botcheck");
        assert_eq!(json["version"], VERSION);

        // MAJOR.MINOR.PATCH
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| p.parse::<u32>().is_ok()));
    }

    #[tokio::test]
    async fn test_crawlers_endpoint_lists_catalog() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/crawlers")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let crawlers = json.as_array().unwrap();
        assert_eq!(crawlers.len(), CrawlerCatalog::builtin().unwrap().len());
        assert!(crawlers.iter().any(|c| c["name"] == "GPTBot"));
        assert!(crawlers[0].get("userAgent").is_some());
    }

    #[tokio::test]
    async fn test_scan_missing_fields_returns_400() {
        let response = create_test_app()
            .oneshot(scan_request(r#"{"url": "example.com"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Missing required fields: url, mode");
    }

    #[tokio::test]
    async fn test_scan_unknown_mode_returns_400() {
        let response = create_test_app()
            .oneshot(scan_request(r#"{"url": "example.com", "mode": "observe"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], r#"Mode must be "block" or "allow""#);
    }

    #[tokio::test]
    async fn test_scan_malformed_body_returns_400() {
        let response = create_test_app()
            .oneshot(scan_request("{not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(json["error"].as_str().is_some_and(|e| !e.is_empty()));
    }

    #[tokio::test]
    async fn test_unexpected_error_maps_to_500() {
        let response = ScanError::Unexpected("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "boom");
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .uri("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json["paths"].get("/api/scan").is_some());
    }

    #[tokio::test]
    async fn test_invalid_route_returns_404() {
        let response = create_test_app()
            .oneshot(Request::builder().uri("/invalid").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
