/*!
 * Request context extractors
 *
 * Responsibility:
 * - Hand the per-request context (trace id, verified claims) to handlers
 * - axum glue lives in core, plain types in types
 *
 * Public API:
 * - TraceId, RequestContext
 * - Traced, Authenticated
 */

mod core;
mod types;

pub use self::core::{Authenticated, Traced};
pub use self::types::{RequestContext, TraceId};
