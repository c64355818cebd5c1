use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::Span;
use crate::domain::models::appointment::Appointment;
use crate::error::AppError;
use crate::state::AppState;

/// Resolves the `{appointment_id}` path segment to a stored appointment.
pub struct ExistingAppointment(pub Appointment);

impl FromRequestParts<Arc<AppState>> for ExistingAppointment {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let params: Path<HashMap<String, String>> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::Validation("Invalid path".into()))?;

        let id = params.get("appointment_id")
            .ok_or(AppError::Validation("Missing appointment id".into()))?;

        Span::current().record("appointment_id", id.as_str());

        let appointment = state.appointment_repo.find_by_id(id).await?
            .ok_or(AppError::NotFound("Appointment not found".into()))?;

        Ok(ExistingAppointment(appointment))
    }
}
