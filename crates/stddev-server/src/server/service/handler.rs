//! The `/random/mean` endpoint.
//!
//! One route, one handler: validate the `requests`/`length` query
//! parameters, run the fan-out pipeline against the configured integer
//! source, and serialize the full result collection as JSON. Generation
//! failures abort the request with a `500` and no partial body.

use crate::server::config::ServerConfig;
use crate::server::service::validation::positive_int;
use crate::server::source::IntegerSource;
use crate::server::streaming::coordinator;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use core::time::Duration;
use serde::Deserialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Shared per-request state: the validated configuration plus the upstream
/// integer source.
pub struct RandomService<S> {
    config: ServerConfig,
    source: Arc<S>,
}

impl<S> RandomService<S> {
    pub fn new(config: ServerConfig, source: S) -> Self {
        Self {
            config,
            source: Arc::new(source),
        }
    }
}

impl<S> Clone for RandomService<S> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            source: Arc::clone(&self.source),
        }
    }
}

/// Raw, unvalidated query parameters of the mean endpoint.
#[derive(Debug, Deserialize)]
struct MeanParams {
    requests: Option<String>,
    length: Option<String>,
}

/// Builds the service router with the standard middleware stack: request
/// ids, request tracing, and an overall per-request timeout.
pub fn router<S>(service: RandomService<S>) -> Router
where
    S: IntegerSource + Send + Sync + 'static,
{
    let timeout = Duration::from_secs(service.config.request_timeout_secs);

    Router::new()
        .route("/random/mean", get(mean::<S>))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(timeout)),
        )
        .with_state(service)
}

/// `GET /random/mean?requests=<n>&length=<n>`
async fn mean<S>(
    State(service): State<RandomService<S>>,
    Query(params): Query<MeanParams>,
) -> Response
where
    S: IntegerSource + Send + Sync + 'static,
{
    let requests = match positive_int("requests", params.requests.as_deref()) {
        Ok(value) => value,
        Err(rejection) => return rejection.into_response(),
    };
    let length = match positive_int("length", params.length.as_deref()) {
        Ok(value) => value,
        Err(rejection) => return rejection.into_response(),
    };

    let outcome = coordinator::collect(
        Arc::clone(&service.source),
        requests,
        length,
        service.config.stream_buffer_size,
    )
    .await;

    match outcome {
        Ok(results) => Json(results).into_response(),
        Err(error) => {
            tracing::error!(%error, "mean calculation failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::error::{Error, Result};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use stddev_core::StdDevResult;
    use stddev_core::types::Integer;
    use tower::ServiceExt;
    use url::Url;

    /// Source returning `0..quantity` for every draw, or a fixed failure.
    struct StubSource {
        fail: bool,
    }

    #[async_trait]
    impl IntegerSource for StubSource {
        async fn integers(&self, quantity: usize) -> Result<Vec<Integer>> {
            if self.fail {
                return Err(Error::Status {
                    status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                    body: "stub failure".to_owned(),
                });
            }
            Ok((0..quantity as Integer).collect())
        }
    }

    fn test_router(fail: bool) -> Router {
        let config = ServerConfig {
            server_addr: "0.0.0.0:8080".to_owned(),
            source_url: Url::parse("https://www.random.org/integers/").unwrap(),
            source_min: 1,
            source_max: 10,
            source_timeout_secs: 10,
            request_timeout_secs: 60,
            stream_buffer_size: 8,
        };
        router(RandomService::new(config, StubSource { fail }))
    }

    async fn send(router: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn rejects_invalid_query_parameters() {
        let cases: &[(&str, &str)] = &[
            ("/random/mean", "requests parameter must be an integer"),
            (
                "/random/mean?requests=2",
                "length parameter must be an integer",
            ),
            (
                "/random/mean?requests=A&length=5",
                "requests parameter must be an integer",
            ),
            (
                "/random/mean?requests=2&length=B",
                "length parameter must be an integer",
            ),
            (
                "/random/mean?requests=0&length=5",
                "requests parameter must be a positive integer",
            ),
            (
                "/random/mean?requests=2&length=-1",
                "length parameter must be a positive integer",
            ),
        ];

        for (uri, message) in cases {
            let (status, body) = send(test_router(false), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "uri: {uri}");
            assert_eq!(String::from_utf8(body).unwrap(), *message, "uri: {uri}");
        }
    }

    #[tokio::test]
    async fn maps_generation_failures_to_internal_server_error() {
        let (status, body) = send(test_router(true), "/random/mean?requests=2&length=5").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn responds_with_the_full_result_collection() {
        let (status, body) = send(test_router(false), "/random/mean?requests=2&length=5").await;
        assert_eq!(status, StatusCode::OK);

        let results: Vec<StdDevResult> = serde_json::from_slice(&body).unwrap();
        assert_eq!(results.len(), 3);

        // Two per-set entries over 0..5, then the cumulative entry.
        for result in &results[..2] {
            assert_eq!(result.data, vec![0, 1, 2, 3, 4]);
            assert_eq!(result.stddev, 1.4142135623730951);
        }
        let cumulative = &results[2];
        assert_eq!(cumulative.data.len(), 10);
        assert_eq!(cumulative.stddev, 1.4142135623730951);
    }
}
