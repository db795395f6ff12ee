/*
 * Responsibility
 * - Config → keys/token service/store → Router
 * - Stage order (outermost first): trace → http limits → access (protected routes only)
 * - axum::serve() with graceful shutdown
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::Config,
    middleware::{self, http::HttpLimits},
    repos::{MemoryStore, PgStore, Store},
    services::auth::{KeyPair, TokenService},
    state::AppState,
};

fn init_tracing() {
    // RUST_LOG wins when set, e.g. RUST_LOG=info,service_app=debug
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development fails fast; production keeps serving.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("loading configuration")?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, config.http_limits());

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    // Unreadable or invalid keys are fatal: the service never starts half-configured.
    let keys = KeyPair::load(&config.private_key, &config.public_key)
        .context("loading RSA key pair")?;
    let auth = Arc::new(TokenService::new(keys, config.token_policy()));

    let store: Arc<dyn Store> = match config.database_url.as_deref() {
        Some(url) => {
            let store = PgStore::connect(url)
                .await
                .context("connecting to the database")?;
            store.migrate().await.context("applying schema")?;
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using the in-memory store (data is lost on restart)");
            Arc::new(MemoryStore::new())
        }
    };
    tracing::info!(store = store.backend_name(), "store ready");

    Ok(AppState::new(auth, store))
}

pub fn build_router(state: AppState, limits: HttpLimits) -> Router {
    let protected = middleware::access::apply(api::protected_routes(), state.auth.clone());
    let router = api::public_routes().merge(protected);

    // Later layers wrap earlier ones.
    let router = middleware::http::apply(router, limits);
    let router = middleware::trace::apply(router);

    router.with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        // Without a signal handler, keep serving.
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
