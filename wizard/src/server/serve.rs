//! HTTP server setup

use std::future::Future;
use std::sync::Arc;

use axum::{
    routing::{get, patch, post, put},
    Router,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::app::options::ServerOptions;
use crate::errors::WizardError;
use crate::server::handlers::{
    advance_handler, create_session_handler, delete_session_handler, edit_field_handler,
    get_session_handler, health_handler, retreat_handler, select_backend_handler, submit_handler,
    version_handler,
};
use crate::server::state::ServerState;

/// Build the session API router
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        // Health and version
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        // Sessions
        .route("/wizards", post(create_session_handler))
        .route(
            "/wizards/{id}",
            get(get_session_handler).delete(delete_session_handler),
        )
        // Wizard
        .route("/wizards/{id}/fields", patch(edit_field_handler))
        .route("/wizards/{id}/advance", post(advance_handler))
        .route("/wizards/{id}/retreat", post(retreat_handler))
        // Submission
        .route("/wizards/{id}/backend", put(select_backend_handler))
        .route("/wizards/{id}/submit", post(submit_handler))
        // State and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server
pub async fn serve(
    options: &ServerOptions,
    state: Arc<ServerState>,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<JoinHandle<Result<(), WizardError>>, WizardError> {
    let app = router(state);

    let addr = format!("{}:{}", options.host, options.port);
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| WizardError::ServerError(e.to_string()))?;

    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| WizardError::ServerError(e.to_string()))
    });

    Ok(handle)
}
