//! Tracing stage: one trace id per inbound request.
//!
//! Responsibility:
//! - Generate a TraceId and attach it to the request context
//! - Log request start (method, path, trace id) and completion (status, trace id)
//! - Echo the trace id to the client in `x-trace-id`
//!
//! This stage must be the outermost application layer. Inner stages turn
//! every failure into a response, so completion is logged on every exit path;
//! a request dropped mid-flight (client gone, shutdown) logs "request cancelled".

use std::time::Instant;

use axum::{
    Router,
    body::Body,
    http::{HeaderName, HeaderValue, Method, Request, StatusCode},
    middleware::{self, Next},
    response::Response,
};
use tracing::{Instrument, info, info_span, warn};

use crate::api::extractors::{RequestContext, TraceId};

pub const TRACE_ID_HEADER: HeaderName = HeaderName::from_static("x-trace-id");

pub fn apply<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn(trace_middleware))
}

pub async fn trace_middleware(mut req: Request<Body>, next: Next) -> Response {
    let trace_id = TraceId::new();

    let ctx = req
        .extensions()
        .get::<RequestContext>()
        .cloned()
        .unwrap_or_default()
        .with_trace_id(trace_id.clone());
    req.extensions_mut().insert(ctx);

    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let span = info_span!("request", trace_id = %trace_id);

    async move {
        info!(%trace_id, %method, %path, "request started");
        let mut in_flight = InFlight::new(&trace_id, &method, &path);

        let mut res = next.run(req).await;

        in_flight.complete(res.status());
        if let Ok(value) = HeaderValue::from_str(trace_id.as_str()) {
            res.headers_mut().insert(TRACE_ID_HEADER, value);
        }
        res
    }
    .instrument(span)
    .await
}

// Logs completion, or cancellation when dropped before `complete`.
struct InFlight<'a> {
    trace_id: &'a TraceId,
    method: &'a Method,
    path: &'a str,
    started: Instant,
    done: bool,
}

impl<'a> InFlight<'a> {
    fn new(trace_id: &'a TraceId, method: &'a Method, path: &'a str) -> Self {
        Self {
            trace_id,
            method,
            path,
            started: Instant::now(),
            done: false,
        }
    }

    fn complete(&mut self, status: StatusCode) {
        self.done = true;
        info!(
            trace_id = %self.trace_id,
            method = %self.method,
            path = %self.path,
            status = status.as_u16(),
            latency_ms = self.started.elapsed().as_millis() as u64,
            "request completed"
        );
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.done {
            warn!(
                trace_id = %self.trace_id,
                method = %self.method,
                path = %self.path,
                latency_ms = self.started.elapsed().as_millis() as u64,
                "request cancelled"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::extractors::Traced;
    use axum::routing::get;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn echo_trace(Traced(id): Traced) -> String {
        id.to_string()
    }

    fn app() -> Router {
        apply(Router::new().route("/echo", get(echo_trace)))
    }

    async fn call(app: Router) -> (StatusCode, Option<String>, String) {
        let res = app
            .oneshot(Request::get("/echo").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let header = res
            .headers()
            .get(TRACE_ID_HEADER)
            .map(|v| v.to_str().unwrap().to_string());
        let body = res.into_body().collect().await.unwrap().to_bytes();
        (status, header, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn handler_sees_the_trace_id_echoed_in_the_header() {
        let (status, header, body) = call(app()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(header.as_deref(), Some(body.as_str()));
        assert!(uuid::Uuid::parse_str(&body).is_ok());
    }

    #[tokio::test]
    async fn each_request_gets_its_own_trace_id() {
        let (_, a, _) = call(app()).await;
        let (_, b, _) = call(app()).await;
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn handler_without_trace_stage_fails_with_500() {
        let res = Router::new()
            .route("/echo", get(echo_trace))
            .oneshot(Request::get("/echo").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    mod cancellation {
        use super::*;
        use crate::api::extractors::Authenticated;
        use crate::middleware::{access, http};
        use crate::services::auth::{Claims, TokenInvalid, TokenVerifier};
        use std::sync::Arc;
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::time::Duration;
        use tokio::sync::Notify;

        struct AcceptAll;

        impl TokenVerifier for AcceptAll {
            fn validate_token(&self, _token: &str) -> Result<Claims, TokenInvalid> {
                Ok(Claims::new(
                    "svc",
                    42,
                    ["students"],
                    chrono::Utc::now(),
                    chrono::Duration::hours(1),
                ))
            }
        }

        // Handler that parks until released and records how far it got.
        #[derive(Default)]
        struct Gate {
            entered: AtomicBool,
            finished: AtomicBool,
            release: Notify,
        }

        fn parked_app(gate: Arc<Gate>, timeout: Duration) -> Router {
            let handler = move |_auth: Authenticated| {
                let gate = gate.clone();
                async move {
                    gate.entered.store(true, Ordering::SeqCst);
                    gate.release.notified().await;
                    gate.finished.store(true, Ordering::SeqCst);
                    "done"
                }
            };
            let protected = access::apply(
                Router::new().route("/parked", get(handler)),
                Arc::new(AcceptAll),
            );
            let limited = http::apply(
                protected,
                http::HttpLimits {
                    timeout,
                    ..http::HttpLimits::default()
                },
            );
            apply(limited)
        }

        fn parked_request() -> Request<Body> {
            Request::get("/parked")
                .header(axum::http::header::AUTHORIZATION, "Bearer anything")
                .body(Body::empty())
                .unwrap()
        }

        #[tokio::test]
        async fn timed_out_request_never_completes_its_handler() {
            let gate = Arc::new(Gate::default());
            let app = parked_app(gate.clone(), Duration::from_millis(20));

            let res = app.oneshot(parked_request()).await.unwrap();
            assert_eq!(res.status(), StatusCode::REQUEST_TIMEOUT);
            assert!(res.headers().contains_key(TRACE_ID_HEADER));

            gate.release.notify_waiters();
            tokio::time::sleep(Duration::from_millis(20)).await;
            assert!(gate.entered.load(Ordering::SeqCst));
            assert!(!gate.finished.load(Ordering::SeqCst));
        }

        #[tokio::test]
        async fn dropped_request_never_completes_its_handler() {
            let gate = Arc::new(Gate::default());
            let app = parked_app(gate.clone(), Duration::from_secs(30));

            let call = tokio::spawn(app.oneshot(parked_request()));
            for _ in 0..100 {
                if gate.entered.load(Ordering::SeqCst) {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            assert!(gate.entered.load(Ordering::SeqCst));

            call.abort();
            assert!(call.await.unwrap_err().is_cancelled());

            gate.release.notify_one();
            tokio::time::sleep(Duration::from_millis(20)).await;
            assert!(!gate.finished.load(Ordering::SeqCst));
        }
    }
}
