//! Submission: backends, dispatcher and per-session submission state

pub mod backend;
pub mod dispatcher;
pub mod firestore;
pub mod mongodb;
pub mod payload;
pub mod raw;
pub mod state;

pub use backend::{Backend, BackendId, WriteReceipt};
pub use dispatcher::{Dispatcher, VALIDATION_FAILED};
pub use payload::Payload;
pub use state::{AttemptId, Outcome, SubmissionSlot, SubmissionState, SubmissionStatus};
