// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use coffeeshop_rust_server::{
    api::router,
    auth::{AuthorizationGate, CachedKeySet, KeySetProvider, RemoteKeySet, TokenVerifier},
    config::AppConfig,
    logging,
    state::AppState,
    storage::DrinkStore,
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::from_env()?;
    logging::init(config.log_format);

    let drinks = DrinkStore::open(&config.database_path)?;
    drinks.seed_sample()?;

    let remote = RemoteKeySet::for_domain(&config.auth.domain, config.auth.jwks_timeout)?;
    tracing::info!(jwks_url = %remote.jwks_url(), "Using Auth0 key set");
    let key_sets: Arc<dyn KeySetProvider> = match config.auth.jwks_cache_ttl {
        Some(ttl) => Arc::new(CachedKeySet::new(Arc::new(remote), ttl)),
        None => Arc::new(remote),
    };

    let verifier = TokenVerifier::new(
        &config.auth.domain,
        config.auth.audience.clone(),
        config.auth.clock_skew,
    );
    tracing::info!(
        issuer = verifier.issuer(),
        audience = %config.auth.audience,
        "Verifying RS256 access tokens"
    );
    let gate = AuthorizationGate::new(key_sets, verifier);

    let app = router(AppState::new(drinks, gate));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Coffee shop server listening on http://{addr} (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down server");
}
