//! In-memory wizard sessions
//!
//! Each session is an independent wizard plus its submission slot, guarded by
//! its own async mutex. The store index is the only shared state.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::errors::WizardError;
use crate::submit::{BackendId, Dispatcher, Outcome, SubmissionSlot};
use crate::utils::generate_uuid;
use crate::wizard::WizardController;

/// One user's wizard run
#[derive(Debug)]
pub struct Session {
    pub id: String,
    pub wizard: WizardController,
    pub submission: SubmissionSlot,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: String, backend: BackendId) -> Self {
        Self {
            id,
            wizard: WizardController::new(),
            submission: SubmissionSlot::new(backend),
            created_at: Utc::now(),
        }
    }
}

pub type SessionHandle = Arc<Mutex<Session>>;

struct SessionEntry {
    session: SessionHandle,
    last_touched: AtomicU64,
}

fn now_millis() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

/// Capacity-bounded session store
pub struct SessionStore {
    entries: RwLock<HashMap<String, SessionEntry>>,
    capacity: usize,
    default_backend: BackendId,
}

impl SessionStore {
    pub fn new(capacity: usize, default_backend: BackendId) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
            default_backend,
        }
    }

    /// Create a session, evicting the least recently used one at capacity
    pub fn create(&self) -> (String, SessionHandle) {
        let id = generate_uuid();
        let session = Arc::new(Mutex::new(Session::new(id.clone(), self.default_backend)));

        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        if entries.len() >= self.capacity {
            if let Some(oldest_id) = entries
                .iter()
                .min_by_key(|(_, e)| e.last_touched.load(Ordering::Relaxed))
                .map(|(id, _)| id.clone())
            {
                info!("Session store full, evicting session {}", oldest_id);
                entries.remove(&oldest_id);
            }
        }

        entries.insert(
            id.clone(),
            SessionEntry {
                session: session.clone(),
                last_touched: AtomicU64::new(now_millis()),
            },
        );
        debug!("Session {} created", id);
        (id, session)
    }

    /// Get a session and mark it as used
    pub fn get(&self, id: &str) -> Result<SessionHandle, WizardError> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let entry = entries
            .get(id)
            .ok_or_else(|| WizardError::SessionNotFound(id.to_string()))?;
        entry.last_touched.store(now_millis(), Ordering::Relaxed);
        Ok(entry.session.clone())
    }

    /// Remove a session
    pub fn remove(&self, id: &str) -> Result<(), WizardError> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries
            .remove(id)
            .map(|_| debug!("Session {} removed", id))
            .ok_or_else(|| WizardError::SessionNotFound(id.to_string()))
    }

    /// Remove every session untouched for longer than `max_idle`
    ///
    /// Returns the number of sessions removed.
    pub fn sweep_idle(&self, max_idle: Duration) -> usize {
        let cutoff = now_millis().saturating_sub(max_idle.as_millis() as u64);
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        entries.retain(|_, e| e.last_touched.load(Ordering::Relaxed) >= cutoff);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every session
    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.clear();
    }
}

/// Run one submission attempt for `session`
///
/// Gating, `finish` and `begin` happen under one lock; the lock is released
/// while the backend write runs and taken again to record the outcome.
pub async fn submit(session: &SessionHandle, dispatcher: &Dispatcher) -> Result<Outcome, WizardError> {
    let (record, backend, attempt) = {
        let mut guard = session.lock().await;
        guard.submission.check_ready()?;
        let record = guard.wizard.finish()?;
        let attempt = guard.submission.begin()?;
        (record, guard.submission.backend(), attempt)
    };

    let outcome = dispatcher.submit(&record, backend).await;

    let mut guard = session.lock().await;
    guard.submission.finish(attempt, outcome.clone());
    info!("Session {} submission to {}: {}", guard.id, backend, outcome.message());
    Ok(outcome)
}
