// Copyright 2025 Contributors to the approovtoken project.
// SPDX-License-Identifier: Apache-2.0

//! Demo "shapes" API server.
//!
//! * `/v1/*` endpoints are not protected.
//! * `/v2/hello` is not protected.
//! * `/v2/shapes` requires a valid Approov token.
//! * `/v2/forms` requires a valid Approov token bound to the binding header.

pub mod handlers;

use crate::config::{self, Config};
use crate::intercept::{guard, BindingCheck, Chain, TokenCheck};
use anyhow::{Context, Result};
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;
use axum_server::tls_openssl::OpenSSLConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// State shared by the endpoints
#[derive(Debug, Clone)]
pub struct AppState {
    pub full_url: String,
}

/// Build the router, with the Approov interceptors in front of the protected
/// endpoints
pub fn router(config: &Config) -> Result<Router, config::Error> {
    let verifier = Arc::new(config.approov.verifier()?);
    let policy = config.approov.policy;

    let token_chain = Arc::new(
        Chain::default().with(TokenCheck::new(verifier.clone(), policy)),
    );

    let binding_chain = Arc::new(
        Chain::default()
            .with(TokenCheck::new(verifier, policy))
            .with(BindingCheck::new(
                config.approov.binding_header.clone(),
                policy,
            )),
    );

    let state = Arc::new(AppState {
        full_url: config.server.full_url(),
    });

    let shapes = Router::new()
        .route("/v2/shapes", get(handlers::shapes))
        .route_layer(from_fn_with_state(token_chain, guard));

    let forms = Router::new()
        .route("/v2/forms", get(handlers::forms))
        .route_layer(from_fn_with_state(binding_chain, guard));

    let app = Router::new()
        .route("/", get(handlers::index))
        .route("/v1/hello", get(handlers::hello))
        .route("/v1/shapes", get(handlers::shapes))
        .route("/v1/forms", get(handlers::forms))
        .route("/v2/hello", get(handlers::hello))
        .merge(shapes)
        .merge(forms)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    Ok(app)
}

/// Run the server until a termination signal is received
pub async fn serve(config: Config) -> Result<()> {
    let app = router(&config).context("Failed to set up the Approov checks")?;

    let addr = config.server.socket_addr();
    let full_url = config.server.full_url();

    let handle = axum_server::Handle::new();
    tokio::spawn(shutdown_signal(handle.clone()));

    if config.server.https_enabled() {
        let pem = config.server.certificate_pem();
        let key = config.server.certificate_key();

        let tls_config = OpenSSLConfig::from_pem_file(&pem, &key).context(format!(
            "Failed to load TLS certificates '{}' and '{}'",
            pem.display(),
            key.display()
        ))?;

        info!("Shapes server listening on {} ({})", full_url, addr);

        axum_server::bind_openssl(addr, tls_config)
            .handle(handle)
            .serve(app.into_make_service())
            .await
            .context("HTTPS server error")?;
    } else {
        info!("Shapes server listening on {} ({})", full_url, addr);

        axum_server::bind(addr)
            .handle(handle)
            .serve(app.into_make_service())
            .await
            .context("HTTP server error")?;
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM, then shut the server down gracefully
pub async fn shutdown_signal(handle: axum_server::Handle) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Received termination signal, shutting down...");

    handle.graceful_shutdown(Some(Duration::from_secs(10)));
}
