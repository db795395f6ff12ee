//! Authorization stage: bearer token → verified Claims in the request context.
//!
//! Per request: `Start → HeaderChecked → TokenValidated → Authorized`, or
//! `Rejected` at any checkpoint (missing trace id, malformed header, invalid
//! token). A rejected request returns its error response right away and the
//! next stage never runs.
//!
//! Must sit behind the trace stage (see `middleware::trace`).

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderValue, Request, header},
    middleware::{self, Next},
    response::Response,
};
use thiserror::Error;

use crate::api::extractors::RequestContext;
use crate::error::AppError;
use crate::services::auth::TokenVerifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("expected authorization header format: Bearer <token>")]
pub struct HeaderMalformed;

/// Protect every route of `router` (route layer: runs only for matched routes).
pub fn apply<S>(router: Router<S>, verifier: Arc<dyn TokenVerifier>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(verifier, access_middleware))
}

pub async fn access_middleware(
    State(verifier): State<Arc<dyn TokenVerifier>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let ctx = req
        .extensions()
        .get::<RequestContext>()
        .cloned()
        .unwrap_or_default();

    let Some(trace_id) = ctx.trace_id().cloned() else {
        tracing::error!("trace id not present in the request context");
        return Err(AppError::TraceMissing);
    };

    let token = match bearer_token(req.headers().get(header::AUTHORIZATION)) {
        Ok(token) => token,
        Err(err) => {
            tracing::warn!(%trace_id, error = %err, "authorization header rejected");
            return Err(AppError::Unauthorized);
        }
    };

    let claims = match verifier.validate_token(token) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(%trace_id, error = %err, "access token verification failed");
            return Err(AppError::Unauthorized);
        }
    };

    tracing::debug!(%trace_id, sub = %claims.subject, "request authorized");

    // middleware → extractor
    req.extensions_mut().insert(ctx.with_claims(claims));

    Ok(next.run(req).await)
}

/// `<scheme> <token>`: exactly two space-separated parts, scheme `bearer`
/// in any case, non-empty token.
pub fn bearer_token(value: Option<&HeaderValue>) -> Result<&str, HeaderMalformed> {
    let value = value
        .and_then(|v| v.to_str().ok())
        .ok_or(HeaderMalformed)?;

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None)
            if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() =>
        {
            Ok(token)
        }
        _ => Err(HeaderMalformed),
    }
}
