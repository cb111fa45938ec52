//! Liveness endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::server::AppState;

/// Reports service liveness and the configured source cascade.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let health_info = serde_json::json!({
        "status": "healthy",
        "sources": state.resolver.source_names(),
    });

    (StatusCode::OK, axum::Json(health_info))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use spindrift_core::SpindriftConfig;
    use spindrift_core::resolver::AudioResolver;
    use tower::ServiceExt;

    use crate::server::{AppState, build_router};

    #[tokio::test]
    async fn test_health_reports_cascade_order() {
        let resolver =
            Arc::new(AudioResolver::from_config(&SpindriftConfig::for_testing()).unwrap());
        let app = build_router(AppState { resolver });

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(
            json["sources"],
            serde_json::json!(["conversion-api", "direct-probe", "extract-proxy"])
        );
    }
}
