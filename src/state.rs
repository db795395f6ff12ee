/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 * - Cheap to clone (Arc inside); nothing in here is mutated after startup
 */
use std::sync::Arc;

use crate::repos::Store;
use crate::services::auth::TokenService;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<TokenService>,
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(auth: Arc<TokenService>, store: Arc<dyn Store>) -> Self {
        Self { auth, store }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("auth", &self.auth)
            .field("store", &self.store.backend_name())
            .finish()
    }
}
