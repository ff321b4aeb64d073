//! Submission state machine
//!
//! ```text
//! idle ──begin──▶ in_progress ──finish──▶ succeeded
//!   ▲                  │                     │
//!   │                  └──────finish───▶ failed ──begin──▶ in_progress
//!   └──────────── select_backend ─────────────┘
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::WizardError;
use crate::submit::backend::BackendId;

/// Result of one submission attempt
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Succeeded {
        message: String,
        payload: Option<Value>,
    },
    Failed {
        message: String,
    },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            Outcome::Succeeded { message, .. } | Outcome::Failed { message } => message,
        }
    }

    pub fn payload(&self) -> Option<&Value> {
        match self {
            Outcome::Succeeded { payload, .. } => payload.as_ref(),
            Outcome::Failed { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    InProgress,
    Succeeded,
    Failed,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Idle => "idle",
            SubmissionStatus::InProgress => "in_progress",
            SubmissionStatus::Succeeded => "succeeded",
            SubmissionStatus::Failed => "failed",
        }
    }
}

/// Status banner of the selected backend
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionState {
    pub status: SubmissionStatus,
    pub message: String,
    pub payload: Option<Value>,
}

/// Handle for one started attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptId(u64);

/// Selected backend plus its submission state
///
/// Allows at most one attempt in flight and no new attempt after a success.
#[derive(Debug, Clone, Default)]
pub struct SubmissionSlot {
    backend: BackendId,
    state: SubmissionState,
    attempts: u64,
    in_flight: Option<AttemptId>,
}

impl SubmissionSlot {
    pub fn new(backend: BackendId) -> Self {
        Self {
            backend,
            ..Default::default()
        }
    }

    pub fn backend(&self) -> BackendId {
        self.backend
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn status(&self) -> SubmissionStatus {
        self.state.status
    }

    /// Switch backend and reset the state
    pub fn select_backend(&mut self, backend: BackendId) -> Result<(), WizardError> {
        if self.state.status == SubmissionStatus::InProgress {
            warn!("Backend switch to {} rejected: submission in progress", backend);
            return Err(WizardError::SubmissionInProgress);
        }

        debug!("Backend {} -> {}", self.backend, backend);
        self.backend = backend;
        self.state = SubmissionState::default();
        Ok(())
    }

    /// Check that a new attempt may start
    pub fn check_ready(&self) -> Result<(), WizardError> {
        match self.state.status {
            SubmissionStatus::InProgress => Err(WizardError::SubmissionInProgress),
            SubmissionStatus::Succeeded => Err(WizardError::AlreadySubmitted),
            SubmissionStatus::Idle | SubmissionStatus::Failed => Ok(()),
        }
    }

    pub fn can_submit(&self) -> bool {
        self.check_ready().is_ok()
    }

    /// Start an attempt
    pub fn begin(&mut self) -> Result<AttemptId, WizardError> {
        self.check_ready()?;

        self.attempts += 1;
        let attempt = AttemptId(self.attempts);
        self.in_flight = Some(attempt);
        self.state = SubmissionState {
            status: SubmissionStatus::InProgress,
            message: String::new(),
            payload: None,
        };
        Ok(attempt)
    }

    /// Record the outcome of `attempt`
    ///
    /// Returns `false` and changes nothing when `attempt` is not the one in
    /// flight.
    pub fn finish(&mut self, attempt: AttemptId, outcome: Outcome) -> bool {
        if self.in_flight != Some(attempt) {
            warn!("Ignoring outcome of stale submission attempt {:?}", attempt);
            return false;
        }

        self.in_flight = None;
        self.state = match outcome {
            Outcome::Succeeded { message, payload } => SubmissionState {
                status: SubmissionStatus::Succeeded,
                message,
                payload,
            },
            Outcome::Failed { message } => SubmissionState {
                status: SubmissionStatus::Failed,
                message,
                payload: None,
            },
        };
        true
    }
}
