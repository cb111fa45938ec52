//! Streaming endpoint: resolution result to HTTP response translation.
//!
//! Deliberately thin: input validation, one resolver call, and the
//! mapping of its outcome onto a redirect, a pass-through stream, or the
//! fixed 503 body. All retry and priority logic lives in the core.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, Response, StatusCode, header};
use spindrift_core::resolver::{
    ProxiedStream, ResolveError, ResolveRequest, StreamCandidate, VideoId,
};
use tracing::error;

use crate::server::AppState;

/// Resolves a video identifier to playable audio.
///
/// `GET /stream/{video_id}` with an optional `Range` header that is
/// forwarded verbatim to the proxy step.
pub async fn stream_audio(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
) -> Response<Body> {
    let video_id = match VideoId::new(&video_id) {
        Ok(id) => id,
        Err(e) => {
            error!("rejected stream request: {}", e);
            return error_response(StatusCode::BAD_REQUEST, e.user_message());
        }
    };

    let range = headers
        .get(header::RANGE)
        .and_then(|value| value.to_str().ok())
        .map(String::from);

    let request = ResolveRequest::new(video_id).with_range(range);

    match state.resolver.resolve(&request).await {
        Ok(StreamCandidate::Redirect { url }) => redirect_response(&url),
        Ok(StreamCandidate::Proxied(stream)) => proxied_response(stream),
        Err(e) => {
            // Provider-level detail stays in the logs; callers get one
            // generic failure.
            error!("resolution failed for {}: {}", request.video_id, e);
            error_response(StatusCode::SERVICE_UNAVAILABLE, e.user_message())
        }
    }
}

/// Rejects `/stream` requests that carry no identifier segment at all.
///
/// Routed explicitly so a bare `/stream` or `/stream/` answers the same
/// fixed 400 body as a blank identifier instead of a router 404.
pub async fn stream_missing_id() -> Response<Body> {
    let error = ResolveError::InvalidVideoId {
        reason: "missing identifier".to_string(),
    };
    error!("rejected stream request: {}", error);
    error_response(StatusCode::BAD_REQUEST, error.user_message())
}

/// 302 redirect to the resolved upstream URL.
fn redirect_response(url: &str) -> Response<Body> {
    let Ok(location) = HeaderValue::from_str(url) else {
        error!("resolved URL is not a valid Location header: {}", url);
        return error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            ResolveError::AllSourcesExhausted.user_message(),
        );
    };

    Response::builder()
        .status(StatusCode::FOUND)
        .header(header::LOCATION, location)
        .body(Body::empty())
        .unwrap()
}

/// Pass-through of the upstream status, headers, and live body.
fn proxied_response(stream: ProxiedStream) -> Response<Body> {
    let status = StatusCode::from_u16(stream.status).unwrap_or(StatusCode::OK);
    let content_type = HeaderValue::from_str(&stream.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("audio/mpeg"));

    let mut builder = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::ACCEPT_RANGES, "bytes");

    if let Some(length) = stream.content_length {
        builder = builder.header(header::CONTENT_LENGTH, length);
    }

    builder.body(Body::from_stream(stream.body)).unwrap()
}

/// Fixed JSON error body.
fn error_response(status: StatusCode, message: &str) -> Response<Body> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({ "error": message }).to_string(),
        ))
        .unwrap()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use axum::body::to_bytes;
    use axum::http::Request;
    use bytes::Bytes;
    use futures::stream;
    use spindrift_core::resolver::{
        AdapterFailure, AudioResolver, SourceAdapter,
    };
    use tower::ServiceExt;

    use super::*;
    use crate::server::build_router;

    /// Fake source with a fixed outcome and range capture.
    struct FakeSource {
        name: &'static str,
        outcome: Outcome,
        calls: AtomicUsize,
        seen_range: Mutex<Option<String>>,
    }

    enum Outcome {
        Redirect(&'static str),
        Proxied,
        Fail,
    }

    impl FakeSource {
        fn new(name: &'static str, outcome: Outcome) -> Arc<Self> {
            Arc::new(Self {
                name,
                outcome,
                calls: AtomicUsize::new(0),
                seen_range: Mutex::new(None),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl SourceAdapter for FakeSource {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn resolve(
            &self,
            request: &ResolveRequest,
        ) -> Result<StreamCandidate, AdapterFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.seen_range.lock().unwrap() = request.range.clone();

            match self.outcome {
                Outcome::Redirect(url) => Ok(StreamCandidate::Redirect {
                    url: url.to_string(),
                }),
                Outcome::Proxied => Ok(StreamCandidate::Proxied(ProxiedStream {
                    status: 206,
                    content_type: "audio/webm".to_string(),
                    content_length: Some(900),
                    body: Box::pin(stream::iter(vec![Ok(Bytes::from_static(b"partial"))])),
                })),
                Outcome::Fail => Err(AdapterFailure::NoUsableOption),
            }
        }
    }

    fn app(sources: Vec<Arc<FakeSource>>) -> axum::Router {
        let adapters = sources
            .into_iter()
            .map(|source| source as Arc<dyn SourceAdapter>)
            .collect();
        build_router(AppState {
            resolver: Arc::new(AudioResolver::new(adapters)),
        })
    }

    async fn body_json(response: Response<Body>) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_blank_video_id_is_rejected_before_any_source_call() {
        let source = FakeSource::new("fake", Outcome::Redirect("https://a.example"));
        let app = app(vec![source.clone()]);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/stream/%20%20")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "Video ID is required" })
        );
        assert_eq!(source.call_count(), 0);
    }

    #[tokio::test]
    async fn test_absent_video_id_segment_is_rejected_with_fixed_400() {
        let source = FakeSource::new("fake", Outcome::Redirect("https://a.example"));

        for uri in ["/stream", "/stream/"] {
            let app = app(vec![source.clone()]);
            let response = app
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                body_json(response).await,
                serde_json::json!({ "error": "Video ID is required" })
            );
        }
        assert_eq!(source.call_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_video_id_is_rejected() {
        let source = FakeSource::new("fake", Outcome::Redirect("https://a.example"));
        let app = app(vec![source.clone()]);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/stream/abc%2F..%2Fetc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(source.call_count(), 0);
    }

    #[tokio::test]
    async fn test_redirect_outcome_maps_to_302() {
        let source = FakeSource::new(
            "fake",
            Outcome::Redirect("https://cdn.example/audio.mp3"),
        );
        let app = app(vec![source]);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/stream/abc123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "https://cdn.example/audio.mp3"
        );
    }

    #[tokio::test]
    async fn test_proxied_outcome_passes_status_headers_and_body_through() {
        let source = FakeSource::new("fake", Outcome::Proxied);
        let app = app(vec![source.clone()]);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/stream/abc123")
                    .header(header::RANGE, "bytes=100-")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "audio/webm"
        );
        assert_eq!(
            response.headers().get(header::ACCEPT_RANGES).unwrap(),
            "bytes"
        );
        assert_eq!(
            response.headers().get(header::CONTENT_LENGTH).unwrap(),
            "900"
        );

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"partial");

        // The client range reached the adapter verbatim.
        assert_eq!(
            source.seen_range.lock().unwrap().as_deref(),
            Some("bytes=100-")
        );
    }

    #[tokio::test]
    async fn test_exhausted_cascade_maps_to_fixed_503() {
        let first = FakeSource::new("first", Outcome::Fail);
        let second = FakeSource::new("second", Outcome::Fail);
        let app = app(vec![first.clone(), second.clone()]);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/stream/abc123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({
                "error": "Unable to stream audio. All sources unavailable."
            })
        );
        assert_eq!(first.call_count(), 1);
        assert_eq!(second.call_count(), 1);
    }

    #[tokio::test]
    async fn test_identical_requests_yield_same_outcome_class() {
        let source = FakeSource::new(
            "fake",
            Outcome::Redirect("https://cdn.example/audio.mp3"),
        );
        let app = app(vec![source.clone()]);

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .uri("/stream/abc123")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::FOUND);
        }
        assert_eq!(source.call_count(), 2);
    }
}
