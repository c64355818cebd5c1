use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{AppointmentListQuery, ConflictQuery};
use crate::api::dtos::responses::ConflictsResponse;
use crate::api::extractors::appointment::ExistingAppointment;
use crate::domain::models::draft::EditDraft;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AppointmentListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let appointments = state.appointment_repo.list(query.date.as_deref()).await?;
    Ok(Json(appointments))
}

pub async fn get_appointment(
    ExistingAppointment(appointment): ExistingAppointment,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(appointment))
}

pub async fn update_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<String>,
    Json(draft): Json<EditDraft>,
) -> Result<impl IntoResponse, AppError> {
    info!("update_appointment: {} -> {} {} with {}", appointment_id, draft.date, draft.time, draft.technician_id);
    let updated = state.appointment_service.update(&appointment_id, &draft).await?;
    Ok(Json(updated))
}

/// Technicians already holding the requested slot, not counting this appointment.
pub async fn get_conflicts(
    State(state): State<Arc<AppState>>,
    ExistingAppointment(appointment): ExistingAppointment,
    Query(query): Query<ConflictQuery>,
) -> Result<impl IntoResponse, AppError> {
    let date = query.date.unwrap_or_default();
    let time = query.time.unwrap_or_default();

    let technician_ids = state.appointment_service
        .find_conflicting_technician_ids(&date, &time, &appointment.id)
        .await?;

    Ok(Json(ConflictsResponse { date, time, technician_ids }))
}
