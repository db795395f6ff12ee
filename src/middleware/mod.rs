/*
 * Responsibility
 * - Request pipeline stages, outermost first:
 *   trace (all routes) → http limits (all routes) → access (protected routes only)
 */
pub mod access;
pub mod http;
pub mod trace;
