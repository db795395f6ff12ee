/*
 * Responsibility
 * - Request-scoped context types seen by handlers (trace id, verified claims)
 * - Middleware stages derive a new RequestContext and put it in request extensions;
 *   handlers only read it
 *
 * Notes
 * - Token verification lives in services/auth, the gate in middleware/access
 */
use std::fmt;

use uuid::Uuid;

use crate::services::auth::Claims;

/// Per-request correlation id (UUID v4). Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TraceId(String);

impl TraceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the pipeline knows about the current request.
///
/// Values are never mutated in place: each stage builds a new one with
/// `with_*` and replaces the previous value on its own request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    trace_id: Option<TraceId>,
    claims: Option<Claims>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trace_id(self, trace_id: TraceId) -> Self {
        Self {
            trace_id: Some(trace_id),
            ..self
        }
    }

    pub fn with_claims(self, claims: Claims) -> Self {
        Self {
            claims: Some(claims),
            ..self
        }
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn claims(&self) -> Option<&Claims> {
        self.claims.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use std::collections::HashSet;

    #[test]
    fn trace_ids_are_unique_uuids() {
        let ids: HashSet<TraceId> = (0..1000).map(|_| TraceId::new()).collect();
        assert_eq!(ids.len(), 1000);
        assert!(ids.iter().all(|id| Uuid::parse_str(id.as_str()).is_ok()));
    }

    #[test]
    fn empty_context_has_nothing() {
        let ctx = RequestContext::new();
        assert!(ctx.trace_id().is_none());
        assert!(ctx.claims().is_none());
    }

    #[test]
    fn with_builds_new_values_and_keeps_earlier_fields() {
        let id = TraceId::new();
        let traced = RequestContext::new().with_trace_id(id.clone());
        let claims = Claims::new("svc", 3, ["a"], Utc::now(), Duration::hours(1));
        let authed = traced.clone().with_claims(claims.clone());

        assert!(traced.claims().is_none());
        assert_eq!(authed.trace_id(), Some(&id));
        assert_eq!(authed.claims(), Some(&claims));
    }
}
