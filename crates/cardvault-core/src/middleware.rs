use std::time::Duration;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::http::{HeaderName, Request};
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;
use tracing::Level;
use uuid::Uuid;

use crate::error::handle_layer_error;

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone, Default)]
pub struct MakeUuidRequestId;

impl MakeRequestId for MakeUuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        Uuid::new_v4().to_string().parse().ok().map(RequestId::new)
    }
}

/// Build the request-id layer. Keeps an incoming `x-request-id`, otherwise mints a UUID.
pub fn request_id_layer() -> SetRequestIdLayer<MakeUuidRequestId> {
    SetRequestIdLayer::new(HeaderName::from_static(REQUEST_ID_HEADER), MakeUuidRequestId)
}

/// Any origin, any method, any header. Answers preflight `OPTIONS` with an empty 200.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Wrap a fully-routed service with the stack every service shares, outermost first:
/// request id, tracing, request-id propagation, CORS, request timeout.
/// A timed-out request answers 408 with the shared JSON error body.
pub fn with_common_layers(router: Router, request_timeout: Duration) -> Router {
    let header = HeaderName::from_static(REQUEST_ID_HEADER);
    router
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_layer_error))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .layer(cors_layer())
        .layer(PropagateRequestIdLayer::new(header))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(request_id_layer())
}
