use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{CreateTechnicianRequest, TechnicianQuery, UpdateTechnicianRequest};
use crate::domain::models::technician::Technician;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn list_technicians(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TechnicianQuery>,
) -> Result<impl IntoResponse, AppError> {
    let technicians = state.technician_repo.list(query.status).await?;
    Ok(Json(technicians))
}

pub async fn get_technician(
    State(state): State<Arc<AppState>>,
    Path(technician_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let technician = state.technician_repo.find_by_id(&technician_id).await?
        .ok_or(AppError::NotFound("Technician not found".into()))?;
    Ok(Json(technician))
}

pub async fn create_technician(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateTechnicianRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.first_name.trim().is_empty() {
        return Err(AppError::Validation("First name is required".into()));
    }

    let technician = Technician::new(payload.first_name, payload.last_name, payload.phone);
    let created = state.technician_repo.create(&technician).await?;
    info!("Created technician: {}", created.display_name());
    Ok(Json(created))
}

pub async fn update_technician(
    State(state): State<Arc<AppState>>,
    Path(technician_id): Path<String>,
    Json(payload): Json<UpdateTechnicianRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut technician = state.technician_repo.find_by_id(&technician_id).await?
        .ok_or(AppError::NotFound("Technician not found".into()))?;

    if let Some(first_name) = payload.first_name { technician.first_name = first_name; }
    if let Some(last_name) = payload.last_name { technician.last_name = last_name; }
    if let Some(status) = payload.status { technician.status = status; }

    if let Some(phone) = payload.phone {
        technician.phone = if phone.is_empty() { None } else { Some(phone) };
    }

    let updated = state.technician_repo.update(&technician).await?;
    info!("Technician updated: {} ({})", updated.id, updated.status.as_str());
    Ok(Json(updated))
}
