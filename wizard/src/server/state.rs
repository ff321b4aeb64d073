//! Server state

use std::sync::Arc;

use crate::sessions::SessionStore;
use crate::submit::Dispatcher;

/// Server state shared across handlers
pub struct ServerState {
    pub sessions: Arc<SessionStore>,
    pub dispatcher: Arc<Dispatcher>,
}

impl ServerState {
    pub fn new(sessions: Arc<SessionStore>, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            sessions,
            dispatcher,
        }
    }
}
