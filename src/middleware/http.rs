//! HTTP-level middleware (transport concerns shared by every route).
//!
//! Responsibility:
//! - Body size limit
//! - Global timeout (a timed-out request is dropped, inner stages included)
//!
//! Applied inside the trace stage so timeouts are still logged with their
//! trace id. Rejections produced here use the same JSON error body as handlers.

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::error_handling::HandleErrorLayer;
use axum::http::{Request, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use tower::timeout::TimeoutLayer;
use tower::{BoxError, ServiceBuilder};
use tower_http::limit::RequestBodyLimitLayer;

use crate::error::AppError;

#[derive(Clone, Copy, Debug)]
pub struct HttpLimits {
    pub timeout: Duration,
    pub body_limit_bytes: usize,
}

impl Default for HttpLimits {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            body_limit_bytes: 1024 * 1024,
        }
    }
}

pub fn apply<S>(router: Router<S>, limits: HttpLimits) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let layers = ServiceBuilder::new()
        // Make the service error `Infallible` by converting errors into responses.
        .layer(HandleErrorLayer::new(|err: BoxError| async move {
            if err.is::<tower::timeout::error::Elapsed>() {
                tracing::warn!("request timed out");
                AppError::Timeout
            } else {
                tracing::error!(error = %err, "unhandled middleware error");
                AppError::Internal
            }
        }))
        .layer(RequestBodyLimitLayer::new(limits.body_limit_bytes))
        .layer(TimeoutLayer::new(limits.timeout));

    router
        .layer(layers)
        .layer(middleware::from_fn(json_payload_too_large))
}

// RequestBodyLimitLayer answers an oversized Content-Length with a plain-text 413.
async fn json_payload_too_large(req: Request<Body>, next: Next) -> Response {
    let res = next.run(req).await;
    if res.status() == StatusCode::PAYLOAD_TOO_LARGE && !is_json(&res) {
        return AppError::PayloadTooLarge.into_response();
    }
    res
}

fn is_json(res: &Response) -> bool {
    res.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}
