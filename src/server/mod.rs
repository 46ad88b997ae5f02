pub mod error;
pub mod handlers;

pub use error::ApiError;

use std::error::Error;
use std::future::Future;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::config::ServerConfig;
use crate::storage::{MessageStore, open_store};

/// Shared handler state: the injected message store.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MessageStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/messages",
            get(handlers::list_messages).post(handlers::create_message),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves `state` on an already bound listener until `shutdown` resolves.
pub async fn run<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Opens the configured store, binds and serves until Ctrl-C.
pub async fn serve(config: &ServerConfig) -> Result<(), Box<dyn Error>> {
    let store = open_store(&config.storage, config.cursor_options())?;
    let listener = TcpListener::bind(&config.bind_addr).await?;
    log::info!(
        "Chat server listening on http://{} ({:?} storage, {} existing messages)",
        listener.local_addr()?,
        config.storage,
        store.len()?
    );

    run(listener, AppState::new(store), shutdown_signal()).await?;
    log::info!("Chat server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => log::info!("Received shutdown signal, stopping chat server..."),
        Err(err) => log::error!("Failed to listen for shutdown signal: {err}"),
    }
}
