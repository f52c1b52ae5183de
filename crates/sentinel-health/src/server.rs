//! HTTP server implementation using axum.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use sentinel_telemetry::Metrics;

use crate::config::HealthConfig;
use crate::error::{HealthError, HealthResult};

#[derive(Clone)]
struct AppState {
    message: Arc<str>,
}

/// Create the axum router.
pub fn create_router(config: &HealthConfig) -> Router {
    let state = AppState {
        message: Arc::from(config.message.as_str()),
    };

    Router::new()
        .route("/", get(serve_index))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn serve_index(State(state): State<AppState>) -> String {
    state.message.to_string()
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn metrics() -> Response {
    match Metrics::gather_text() {
        Ok(text) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Bind and serve until the listener fails.
pub async fn run_server(config: HealthConfig) -> HealthResult<()> {
    let app = create_router(&config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| HealthError::Bind {
            port: config.port,
            source,
        })?;
    info!(port = config.port, "Starting health server");

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    async fn get_body(path: &str) -> (StatusCode, String) {
        let config = HealthConfig {
            message: "sentinel up".to_string(),
            ..HealthConfig::default()
        };
        let response = create_router(&config)
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_index_returns_message() {
        let (status, body) = get_body("/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "sentinel up");
    }

    #[tokio::test]
    async fn test_health_returns_ok() {
        let (status, body) = get_body("/health").await;
        assert_eq!(status, StatusCode::OK);
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_metrics_exposition() {
        Metrics::tracked_positions(2);
        let (status, body) = get_body("/metrics").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("sentinel_tracked_positions 2"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (status, _) = get_body("/api/snapshot").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_bind_conflict_reported() {
        let holder = tokio::net::TcpListener::bind("0.0.0.0:0").await.unwrap();
        let port = holder.local_addr().unwrap().port();
        let err = run_server(HealthConfig {
            port,
            ..HealthConfig::default()
        })
        .await
        .unwrap_err();
        assert!(matches!(err, HealthError::Bind { .. }));
    }
}
