mod common;

use axum::http::StatusCode;
use common::{parse_body, TestApp};
use salon_backend::domain::models::technician::TechnicianStatus;
use serde_json::json;

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;

    let response = app.send("GET", "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_body(response).await["status"], "ok");
}

#[tokio::test]
async fn test_service_catalog() {
    let app = TestApp::new().await;

    let response = app.send("POST", "/api/v1/services", Some(json!({
        "name": "Pedicure",
        "base_price": 400,
        "add_ons": [{"name": "scrub", "price": 100}, {"name": "oil", "price": 50}]
    }))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let created = parse_body(response).await;
    let service_id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["add_ons"][1]["name"], "oil");

    app.send("POST", "/api/v1/services", Some(json!({"name": "Gel Nails", "base_price": 350}))).await;

    // Ordered by name
    let list = parse_body(app.send("GET", "/api/v1/services", None).await).await;
    let names: Vec<&str> = list.as_array().unwrap().iter().map(|s| s["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Gel Nails", "Pedicure"]);

    let fetched = parse_body(app.send("GET", &format!("/api/v1/services/{}", service_id), None).await).await;
    assert_eq!(fetched["base_price"], 400);

    let missing = app.send("GET", "/api/v1/services/nope", None).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_service_validation() {
    let app = TestApp::new().await;

    let duplicate = app.send("POST", "/api/v1/services", Some(json!({
        "name": "Pedicure",
        "base_price": 400,
        "add_ons": [{"name": "oil", "price": 50}, {"name": "oil", "price": 60}]
    }))).await;
    assert_eq!(duplicate.status(), StatusCode::BAD_REQUEST);
    assert!(parse_body(duplicate).await["error"].as_str().unwrap().contains("oil"));

    let negative = app.send("POST", "/api/v1/services", Some(json!({"name": "Wax", "base_price": -1}))).await;
    assert_eq!(negative.status(), StatusCode::BAD_REQUEST);

    let oversized = app.send("POST", "/api/v1/services", Some(json!({
        "name": "Gold Leaf",
        "base_price": i64::MAX,
        "add_ons": [{"name": "leaf", "price": 1}]
    }))).await;
    assert_eq!(oversized.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(oversized).await["error"], "Prices must be between 0 and 1000000000");

    let unnamed = app.send("POST", "/api/v1/services", Some(json!({"name": "  ", "base_price": 10}))).await;
    assert_eq!(unnamed.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_technician_roster_and_status_filter() {
    let app = TestApp::new().await;
    app.seed_technician("t-b", "Binh", TechnicianStatus::Available).await;

    let response = app.send("POST", "/api/v1/technicians", Some(json!({
        "first_name": "Anh", "last_name": "Le", "phone": "555-0101"
    }))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let created = parse_body(response).await;
    assert_eq!(created["status"], "available");
    let id = created["id"].as_str().unwrap().to_string();

    // Ordered by first name
    let all = parse_body(app.send("GET", "/api/v1/technicians", None).await).await;
    assert_eq!(all[0]["first_name"], "Anh");
    assert_eq!(all[1]["first_name"], "Binh");

    let updated = app.send("PUT", &format!("/api/v1/technicians/{}", id), Some(json!({"status": "on_leave", "phone": ""}))).await;
    assert_eq!(updated.status(), StatusCode::OK);
    let updated = parse_body(updated).await;
    assert_eq!(updated["status"], "on_leave");
    assert!(updated["phone"].is_null());

    let available = parse_body(app.send("GET", "/api/v1/technicians?status=available", None).await).await;
    let ids: Vec<&str> = available.as_array().unwrap().iter().map(|t| t["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["t-b"]);

    let bad_status = app.send("GET", "/api/v1/technicians?status=retired", None).await;
    assert_eq!(bad_status.status(), StatusCode::BAD_REQUEST);

    let missing = app.send("PUT", "/api/v1/technicians/ghost", Some(json!({"first_name": "X"}))).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_customer_records() {
    let app = TestApp::new().await;

    let invalid = app.send("POST", "/api/v1/customers", Some(json!({"full_name": "Mai", "phone": ""}))).await;
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

    let created = parse_body(app.send("POST", "/api/v1/customers", Some(json!({
        "full_name": "Mai Pham", "phone": "555-0199", "note": "Prefers mornings"
    }))).await).await;
    let id = created["id"].as_str().unwrap().to_string();

    let updated = parse_body(app.send("PUT", &format!("/api/v1/customers/{}", id), Some(json!({
        "phone": "555-0200", "note": ""
    }))).await).await;
    assert_eq!(updated["full_name"], "Mai Pham");
    assert_eq!(updated["phone"], "555-0200");
    assert!(updated["note"].is_null());

    let list = parse_body(app.send("GET", "/api/v1/customers", None).await).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let missing = app.send("GET", "/api/v1/customers/ghost", None).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_eq!(parse_body(missing).await["error"], "Customer not found");
}
