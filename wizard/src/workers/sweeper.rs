//! Sweeper worker that discards abandoned sessions

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::{debug, info};

use crate::sessions::SessionStore;

/// Sweeper worker options
#[derive(Debug, Clone)]
pub struct Options {
    /// Time between sweeps
    pub interval: Duration,

    /// Sessions untouched for longer than this are removed
    pub idle_timeout: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            idle_timeout: Duration::from_secs(30 * 60),
        }
    }
}

/// Run the sweeper worker until `shutdown_signal` resolves
pub async fn run<S, F>(
    options: &Options,
    sessions: &SessionStore,
    sleep_fn: S,
    mut shutdown_signal: Pin<Box<dyn Future<Output = ()> + Send>>,
) where
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    info!("Sweeper worker starting...");

    loop {
        tokio::select! {
            _ = &mut shutdown_signal => {
                info!("Sweeper worker shutting down...");
                return;
            }
            _ = sleep_fn(options.interval) => {}
        }

        let removed = sessions.sweep_idle(options.idle_timeout);
        if removed > 0 {
            info!("Removed {} idle session(s)", removed);
        } else {
            debug!("No idle sessions");
        }
    }
}
