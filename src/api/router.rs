use axum::{
    body::Body,
    extract::Request,
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{health, appointment, service, technician, customer};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
    cors::CorsLayer,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Catalog
        .route("/api/v1/services", get(service::list_services).post(service::create_service))
        .route("/api/v1/services/{service_id}", get(service::get_service))

        // Staff
        .route("/api/v1/technicians", get(technician::list_technicians).post(technician::create_technician))
        .route("/api/v1/technicians/{technician_id}", get(technician::get_technician).put(technician::update_technician))

        // Customers
        .route("/api/v1/customers", get(customer::list_customers).post(customer::create_customer))
        .route("/api/v1/customers/{customer_id}", get(customer::get_customer).put(customer::update_customer))

        // Appointments
        .route("/api/v1/appointments", get(appointment::list_appointments))
        .route("/api/v1/appointments/{appointment_id}", get(appointment::get_appointment).put(appointment::update_appointment))
        .route("/api/v1/appointments/{appointment_id}/conflicts", get(appointment::get_conflicts))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        appointment_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
