//! Application state management

use std::sync::Arc;

use tracing::info;

use crate::app::options::AppOptions;
use crate::errors::WizardError;
use crate::sessions::SessionStore;
use crate::submit::Dispatcher;

/// Main application state
pub struct AppState {
    /// Live wizard sessions
    pub sessions: Arc<SessionStore>,

    /// Submission dispatcher with every configured backend
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    /// Initialize application state
    pub fn init(options: &AppOptions) -> Result<Self, WizardError> {
        info!("Initializing application state...");

        let sessions = Arc::new(SessionStore::new(
            options.max_sessions,
            options.backends.default_backend,
        ));
        let dispatcher = Arc::new(Dispatcher::from_settings(&options.backends)?);

        Ok(Self {
            sessions,
            dispatcher,
        })
    }

    /// Shutdown application state
    pub async fn shutdown(&self) -> Result<(), WizardError> {
        info!("Shutting down application state, dropping {} session(s)...", self.sessions.len());
        self.sessions.clear();
        Ok(())
    }
}
