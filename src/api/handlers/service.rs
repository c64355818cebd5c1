use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::CreateServiceRequest;
use crate::domain::models::service::{Service, MAX_PRICE};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn list_services(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let services = state.service_repo.list().await?;
    Ok(Json(services))
}

pub async fn get_service(
    State(state): State<Arc<AppState>>,
    Path(service_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let service = state.service_repo.find_by_id(&service_id).await?
        .ok_or(AppError::NotFound("Service not found".into()))?;
    Ok(Json(service))
}

pub async fn create_service(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateServiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Service name is required".into()));
    }
    let in_range = |price: i64| (0..=MAX_PRICE).contains(&price);
    if !in_range(payload.base_price) || !payload.add_ons.iter().all(|a| in_range(a.price)) {
        return Err(AppError::Validation(format!("Prices must be between 0 and {}", MAX_PRICE)));
    }

    let service = Service::new(payload.name, payload.base_price, payload.add_ons);
    if let Some(name) = service.duplicate_add_on() {
        return Err(AppError::Validation(format!("Duplicate add-on name: {}", name)));
    }

    let created = state.service_repo.create(&service).await?;
    info!("Created service: {} ({} add-ons)", created.name, created.add_ons.len());
    Ok(Json(created))
}
