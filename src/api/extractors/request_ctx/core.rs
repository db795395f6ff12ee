use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::Claims;

use super::{RequestContext, TraceId};

/// Trace id of the current request.
/// Missing means the trace stage is not wired in front of this route: 500.
pub struct Traced(pub TraceId);

/// Verified claims of the current request.
/// Missing means the access stage is not wired in front of this route:
/// fail closed with 401, never fall back to an anonymous subject.
pub struct Authenticated {
    pub trace_id: TraceId,
    pub claims: Claims,
}

impl<S> FromRequestParts<S> for Traced
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .and_then(|ctx| ctx.trace_id().cloned())
            .map(Traced)
            .ok_or_else(|| {
                tracing::error!("trace id not present in the request context");
                AppError::TraceMissing
            })
    }
}

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Traced(trace_id) = Traced::from_request_parts(parts, state).await?;

        let claims = parts
            .extensions
            .get::<RequestContext>()
            .and_then(|ctx| ctx.claims().cloned())
            .ok_or_else(|| {
                tracing::error!(%trace_id, "claims not present in the request context");
                AppError::Unauthorized
            })?;

        Ok(Self { trace_id, claims })
    }
}
