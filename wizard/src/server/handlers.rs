//! HTTP request handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use openapi_server::models::{
    BackendRequest, ErrorResponse, FieldEditRequest, HealthResponse, OutcomeView, SessionResponse,
    StepView, SubmissionView, SubmitResponse, SummaryLineView, VersionResponse, WizardView,
};
use tracing::warn;

use crate::errors::WizardError;
use crate::server::state::ServerState;
use crate::sessions::{self, Session};
use crate::submit::{BackendId, Outcome};
use crate::utils::version_info;
use crate::wizard::{FieldEdit, WizardSnapshot};

// ================================== ERRORS ======================================= //

/// A [`WizardError`] rendered as an HTTP response
#[derive(Debug)]
pub struct ApiError(WizardError);

impl From<WizardError> for ApiError {
    fn from(err: WizardError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            WizardError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            WizardError::UnknownField(_)
            | WizardError::FieldNotApplicable { .. }
            | WizardError::UnknownBackend(_)
            | WizardError::NotAtReview(_)
            | WizardError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            WizardError::SubmissionInProgress | WizardError::AlreadySubmitted => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!("Request failed: {}", self.0);
        }

        let field_errors = match &self.0 {
            WizardError::Validation(errors) => errors.to_map(),
            _ => Default::default(),
        };
        let body = ErrorResponse {
            error: self.0.to_string(),
            field_errors,
        };
        (status, Json(body)).into_response()
    }
}

// =================================== VIEWS ======================================= //

fn wizard_view(snapshot: WizardSnapshot) -> WizardView {
    WizardView {
        current_step: snapshot.current_step,
        step_count: snapshot.step_count,
        step: StepView {
            index: snapshot.step.index(),
            title: snapshot.step.title().to_string(),
            description: snapshot.step.description().to_string(),
        },
        record: snapshot.record,
        field_errors: snapshot.field_errors.to_map(),
        summary: snapshot.summary.map(|lines| {
            lines
                .into_iter()
                .map(|line| SummaryLineView {
                    key: line.key.as_str().to_string(),
                    label: line.label.to_string(),
                    value: line.value,
                })
                .collect()
        }),
    }
}

fn session_view(session: &Session) -> SessionResponse {
    let state = session.submission.state();
    SessionResponse {
        id: session.id.clone(),
        wizard: wizard_view(session.wizard.snapshot()),
        submission: SubmissionView {
            backend: session.submission.backend().as_str().to_string(),
            status: state.status.as_str().to_string(),
            message: state.message.clone(),
            payload: state.payload.clone(),
            can_submit: session.submission.can_submit(),
        },
    }
}

fn outcome_view(outcome: &Outcome) -> OutcomeView {
    OutcomeView {
        success: outcome.is_success(),
        message: outcome.message().to_string(),
        payload: outcome.payload().cloned(),
    }
}

// ================================== HANDLERS ===================================== //

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    let version = version_info();
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "deploywiz".to_string(),
        version: version.version,
    })
}

/// Version handler
pub async fn version_handler() -> impl IntoResponse {
    let version = version_info();
    Json(VersionResponse {
        version: version.version,
        git_hash: version.git_hash,
        build_time: version.build_time,
    })
}

pub async fn create_session_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let (_, handle) = state.sessions.create();
    let session = handle.lock().await;
    (StatusCode::CREATED, Json(session_view(&session)))
}

pub async fn get_session_handler(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let handle = state.sessions.get(&id)?;
    let session = handle.lock().await;
    Ok(Json(session_view(&session)))
}

pub async fn delete_session_handler(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.sessions.remove(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn edit_field_handler(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    Json(request): Json<FieldEditRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let edit = FieldEdit::parse(&request.field, request.value)?;
    let handle = state.sessions.get(&id)?;
    let mut session = handle.lock().await;
    session.wizard.apply_edit(&edit)?;
    Ok(Json(session_view(&session)))
}

/// Blocked advances still answer 200; the errors travel in the snapshot
pub async fn advance_handler(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let handle = state.sessions.get(&id)?;
    let mut session = handle.lock().await;
    let _ = session.wizard.advance();
    Ok(Json(session_view(&session)))
}

pub async fn retreat_handler(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let handle = state.sessions.get(&id)?;
    let mut session = handle.lock().await;
    session.wizard.retreat();
    Ok(Json(session_view(&session)))
}

pub async fn select_backend_handler(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    Json(request): Json<BackendRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let backend: BackendId = request.backend.parse()?;
    let handle = state.sessions.get(&id)?;
    let mut session = handle.lock().await;
    session.submission.select_backend(backend)?;
    Ok(Json(session_view(&session)))
}

pub async fn submit_handler(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let handle = state.sessions.get(&id)?;
    let outcome = sessions::submit(&handle, &state.dispatcher).await?;

    let session = handle.lock().await;
    Ok(Json(SubmitResponse {
        outcome: outcome_view(&outcome),
        session: session_view(&session),
    }))
}
