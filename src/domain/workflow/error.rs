use thiserror::Error;
use tracing::error;
use crate::domain::workflow::edit_session::WorkflowState;
use crate::error::AppError;

/// Errors surfaced to whatever UI drives an edit session. Messages are short
/// and safe to show in a notification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("Appointment not found")]
    NotFound,
    #[error("{0}")]
    LoadFailure(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    WriteFailure(String),
    #[error("Availability check failed: {0}")]
    AvailabilityCheck(String),
    #[error("Not allowed while {0:?}")]
    InvalidState(WorkflowState),
    #[error("A save is already in progress")]
    SubmitInFlight,
    #[error("Edit session closed")]
    Disposed,
}

impl WorkflowError {
    pub fn load_failure(err: &AppError) -> Self {
        error!("Failed to load edit session: {:?}", err);
        WorkflowError::LoadFailure("Could not load the appointment".into())
    }

    pub fn from_write(err: AppError) -> Self {
        match err {
            AppError::Validation(msg) => WorkflowError::Validation(msg),
            AppError::Conflict(msg) => WorkflowError::WriteFailure(msg),
            AppError::NotFound(_) => WorkflowError::WriteFailure("Appointment no longer exists".into()),
            other => {
                error!("Failed to save appointment: {:?}", other);
                WorkflowError::WriteFailure("Could not save the appointment. Please try again.".into())
            }
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, WorkflowError::Validation(_) | WorkflowError::WriteFailure(_))
    }
}
