use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::{AddExtensionLayer, Router};
use log::info;

use crate::api::key::nasa_key;
use crate::api::{Context, KeySource};
use crate::config::ServerConfig;
use crate::models::KEY_ROUTE;

pub fn router(ctx: Arc<Context>) -> Router {
    Router::new()
        .route(KEY_ROUTE, get(nasa_key))
        .layer(AddExtensionLayer::new(ctx))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}

pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    info!("Starting server");
    let ctx = Arc::new(Context {
        key_source: KeySource::Environment(config.key_var.clone()),
    });
    if ctx.key_source.read().is_none() {
        info!(
            "{} is not set, the key endpoint will answer 500 until it is",
            config.key_var
        );
    }
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let server = axum::Server::bind(&addr).serve(router(ctx).into_make_service());
    info!("Server running on http://localhost:{}", config.port);
    server.with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}
