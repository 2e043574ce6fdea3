// src/handlers/health.rs
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use prometheus::{Encoder, Registry, TextEncoder};
use serde_json::json;

/// GET /healthz
pub async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// GET /metrics
pub async fn metrics_endpoint(State(registry): State<Registry>) -> Response {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&registry.gather(), &mut buffer) {
        tracing::error!(error = %e, "❌ Failed to encode metrics");
        return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
    }

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, encoder.format_type().to_owned())],
        buffer,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;
    use route_metrics::RequestMetrics;
    use std::time::Duration;

    #[tokio::test]
    async fn metrics_endpoint_renders_registered_series() {
        let registry = Registry::new();
        let metrics =
            RequestMetrics::with_routes(&registry, "api", ["/users"], Vec::new()).unwrap();
        metrics.record(StatusCode::OK, &Method::GET, "/users/1", Duration::from_millis(3));

        let response = metrics_endpoint(State(registry)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("# TYPE axum_requests_total counter"));
        assert!(text.contains(r#"code="200""#));
        assert!(text.contains(r#"service="api""#));
        assert!(text.contains("axum_request_duration_milliseconds_bucket"));
    }
}
