//! Application configuration options

use std::time::Duration;

use crate::storage::settings::{BackendSettings, Settings};
use crate::workers::sweeper;

/// Main application options
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Lifecycle configuration
    pub lifecycle: LifecycleOptions,

    /// Server configuration
    pub server: ServerOptions,

    /// Maximum number of live sessions
    pub max_sessions: usize,

    /// Submission backends
    pub backends: BackendSettings,

    /// Sweeper worker options
    pub sweeper: sweeper::Options,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            lifecycle: LifecycleOptions::default(),
            server: ServerOptions::default(),
            max_sessions: 1024,
            backends: BackendSettings::default(),
            sweeper: sweeper::Options::default(),
        }
    }
}

impl From<&Settings> for AppOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            lifecycle: LifecycleOptions {
                max_shutdown_delay: Duration::from_secs(settings.shutdown_delay_secs),
            },
            server: ServerOptions {
                host: settings.server.host.clone(),
                port: settings.server.port,
            },
            max_sessions: settings.sessions.max_sessions,
            backends: settings.backends.clone(),
            sweeper: sweeper::Options {
                interval: Duration::from_secs(settings.sessions.sweep_interval_secs),
                idle_timeout: Duration::from_secs(settings.sessions.idle_timeout_secs),
            },
        }
    }
}

/// Lifecycle options
#[derive(Debug, Clone)]
pub struct LifecycleOptions {
    /// Maximum delay for graceful shutdown
    pub max_shutdown_delay: Duration,
}

impl Default for LifecycleOptions {
    fn default() -> Self {
        Self {
            max_shutdown_delay: Duration::from_secs(10),
        }
    }
}

/// HTTP server options
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}
