mod common;

use axum::http::StatusCode;
use common::{parse_body, TestApp};
use salon_backend::domain::models::appointment::AppointmentStatus;
use serde_json::{json, Value};

fn a1_draft(technician_id: &str, time: &str) -> Value {
    json!({
        "customer_name": "Linh Nguyen",
        "customer_phone": "555-0100",
        "customer_note": null,
        "service_id": "svc-haircut",
        "add_ons": [],
        "technician_id": technician_id,
        "date": "2024-05-01",
        "time": time
    })
}

#[tokio::test]
async fn test_list_and_get_appointments() {
    let app = TestApp::new().await;
    app.seed_salon().await;
    app.seed_appointment("A3", "svc-haircut", "t1", "2024-05-02", "09:00", AppointmentStatus::AwaitingConfirmation).await;

    let all = parse_body(app.send("GET", "/api/v1/appointments", None).await).await;
    let ids: Vec<&str> = all.as_array().unwrap().iter().map(|a| a["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["A1", "A2", "A3"]);

    let day = parse_body(app.send("GET", "/api/v1/appointments?date=2024-05-02", None).await).await;
    assert_eq!(day.as_array().unwrap().len(), 1);
    assert_eq!(day[0]["status"], "awaiting_confirmation");

    let a1 = parse_body(app.send("GET", "/api/v1/appointments/A1", None).await).await;
    assert_eq!(a1["technician_id"], "t1");
    assert_eq!(a1["add_ons"], json!([]));

    let missing = app.send("GET", "/api/v1/appointments/ghost", None).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_eq!(parse_body(missing).await["error"], "Appointment not found");
}

#[tokio::test]
async fn test_conflicts_endpoint() {
    let app = TestApp::new().await;
    app.seed_salon().await;
    // Second occupying booking for t2 and a cancelled one for t1 in the same slot.
    app.seed_appointment("A4", "svc-manicure", "t2", "2024-05-01", "11:00", AppointmentStatus::InProgress).await;
    app.seed_appointment("A5", "svc-manicure", "t1", "2024-05-01", "11:00", AppointmentStatus::Cancelled).await;

    let response = app.send("GET", "/api/v1/appointments/A1/conflicts?date=2024-05-01&time=11:00", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_body(response).await;
    assert_eq!(body["technician_ids"], json!(["t2"]));
    assert_eq!(body["time"], "11:00");

    // The appointment itself never counts against its own slot.
    let own_slot = parse_body(app.send("GET", "/api/v1/appointments/A1/conflicts?date=2024-05-01&time=10:00", None).await).await;
    assert_eq!(own_slot["technician_ids"], json!([]));

    // Excluding A2 still leaves A4 holding t2.
    let from_a2 = parse_body(app.send("GET", "/api/v1/appointments/A2/conflicts?date=2024-05-01&time=11:00", None).await).await;
    assert_eq!(from_a2["technician_ids"], json!(["t2"]));

    let incomplete = parse_body(app.send("GET", "/api/v1/appointments/A1/conflicts?date=2024-05-01", None).await).await;
    assert_eq!(incomplete["technician_ids"], json!([]));

    let missing = app.send("GET", "/api/v1/appointments/ghost/conflicts?date=2024-05-01&time=11:00", None).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_recomputes_price_server_side() {
    let app = TestApp::new().await;
    app.seed_salon().await;

    let mut draft = a1_draft("t1", "11:00");
    draft["add_ons"] = json!(["oil", "ghost"]);
    draft["total_price"] = json!(1);

    let response = app.send("PUT", "/api/v1/appointments/A1", Some(draft)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = parse_body(response).await;
    assert_eq!(updated["total_price"], 550);
    assert_eq!(updated["time"], "11:00");
    assert_eq!(updated["status"], "confirmed");

    let reloaded = parse_body(app.send("GET", "/api/v1/appointments/A1", None).await).await;
    assert_eq!(reloaded["add_ons"], json!(["ghost", "oil"]));
    assert_eq!(reloaded["total_price"], 550);
}

#[tokio::test]
async fn test_update_validation() {
    let app = TestApp::new().await;
    app.seed_salon().await;

    let response = app.send("PUT", "/api/v1/appointments/A1", Some(json!({"service_id": "svc-haircut"}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        parse_body(response).await["error"],
        "Missing required fields: technician_id, date, time, customer_name, customer_phone"
    );

    let response = app.send("PUT", "/api/v1/appointments/A1", Some(a1_draft("t1", "11am"))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut unknown_service = a1_draft("t1", "11:00");
    unknown_service["service_id"] = json!("svc-gone");
    let response = app.send("PUT", "/api/v1/appointments/A1", Some(unknown_service)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(response).await["error"], "Unknown service: svc-gone");

    let response = app.send("PUT", "/api/v1/appointments/A1", Some(a1_draft("t-ghost", "11:00"))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.send("PUT", "/api/v1/appointments/ghost", Some(a1_draft("t1", "11:00"))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Nothing was written by the rejected requests.
    let a1 = parse_body(app.send("GET", "/api/v1/appointments/A1", None).await).await;
    assert_eq!(a1["time"], "10:00");
}

#[tokio::test]
async fn test_conflicting_assignment_is_soft_by_default() {
    let app = TestApp::new().await;
    app.seed_salon().await;

    let response = app.send("PUT", "/api/v1/appointments/A1", Some(a1_draft("t2", "11:00"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_body(response).await["technician_id"], "t2");
}

#[tokio::test]
async fn test_strict_mode_rejects_conflicting_assignment() {
    let app = TestApp::strict().await;
    app.seed_salon().await;

    let response = app.send("PUT", "/api/v1/appointments/A1", Some(a1_draft("t2", "11:00"))).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(parse_body(response).await["error"], "Technician is already booked for this slot");

    let a1 = parse_body(app.send("GET", "/api/v1/appointments/A1", None).await).await;
    assert_eq!(a1["technician_id"], "t1");
    assert_eq!(a1["time"], "10:00");

    // A free slot still goes through.
    let response = app.send("PUT", "/api/v1/appointments/A1", Some(a1_draft("t1", "11:00"))).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_strict_mode_rejects_unpadded_slot_spelling() {
    let app = TestApp::strict().await;
    app.seed_salon().await;

    let mut short_date = a1_draft("t2", "11:00");
    short_date["date"] = json!("2024-5-1");
    let response = app.send("PUT", "/api/v1/appointments/A1", Some(short_date)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(response).await["error"], "Invalid date format (YYYY-MM-DD)");

    let response = app.send("PUT", "/api/v1/appointments/A1", Some(a1_draft("t2", "11:0"))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(response).await["error"], "Invalid time format (HH:MM)");

    // t2 keeps a single booking at 11:00.
    let day = parse_body(app.send("GET", "/api/v1/appointments", None).await).await;
    let t2_bookings = day.as_array().unwrap().iter().filter(|a| a["technician_id"] == "t2").count();
    assert_eq!(t2_bookings, 1);
}

#[tokio::test]
async fn test_update_rejects_overflowing_total() {
    let app = TestApp::new().await;
    app.seed_salon().await;
    app.seed_service("svc-gold", "Gold Leaf", i64::MAX, &[("leaf", 1)]).await;

    let mut draft = a1_draft("t1", "10:00");
    draft["service_id"] = json!("svc-gold");
    draft["add_ons"] = json!(["leaf"]);

    let response = app.send("PUT", "/api/v1/appointments/A1", Some(draft)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(response).await["error"], "Total price is out of range");

    let a1 = parse_body(app.send("GET", "/api/v1/appointments/A1", None).await).await;
    assert_eq!(a1["service_id"], "svc-haircut");
}

#[tokio::test]
async fn test_strict_mode_ignores_appointments_not_holding_a_slot() {
    let app = TestApp::strict().await;
    app.seed_salon().await;
    app.seed_appointment("A6", "svc-haircut", "t1", "2024-05-01", "09:00", AppointmentStatus::Cancelled).await;

    let response = app.send("PUT", "/api/v1/appointments/A6", Some(a1_draft("t2", "11:00"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = parse_body(response).await;
    assert_eq!(updated["technician_id"], "t2");
    assert_eq!(updated["status"], "cancelled");

    // The cancelled record still does not count against t2's slot.
    let conflicts = parse_body(app.send("GET", "/api/v1/appointments/A1/conflicts?date=2024-05-01&time=11:00", None).await).await;
    assert_eq!(conflicts["technician_ids"], json!(["t2"]));
}
