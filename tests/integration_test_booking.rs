mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::{json, Value};

struct Venue {
    block_id: String,
    package_id: String,
    food_id: String,
}

async fn setup_venue(app: &TestApp, max_events_per_block: u32) -> Venue {
    let (_, block) = app.admin_post("/api/v1/schedule/time-blocks", json!({
        "name": "Afternoon",
        "days": [5, 6, 0],
        "start_time": "14:00",
        "end_time": "18:00",
        "duration": 3.5,
        "half_hour_break": true,
        "max_events_per_block": max_events_per_block
    })).await;
    let (_, package) = app.admin_post("/api/v1/catalog/packages", json!({
        "name": "Fiesta Total",
        "pricing": { "weekday": 2500, "weekend": 3000 },
        "max_guests": 20
    })).await;
    let (_, food) = app.admin_post("/api/v1/catalog/food-options", json!({
        "name": "Taquiza",
        "base_price": 40,
        "dishes": { "adult": ["Tacos"], "kids": ["Nuggets"] },
        "upgrades": { "adult": [{ "from_dish": "Tacos", "to_dish": "Pastor", "additional_price": 15 }] }
    })).await;
    app.admin_put("/api/v1/settings/payment", json!({
        "cash_discount": { "enabled": true, "percentage": 5 }
    })).await;

    Venue {
        block_id: block["id"].as_str().unwrap().to_string(),
        package_id: package["id"].as_str().unwrap().to_string(),
        food_id: food["id"].as_str().unwrap().to_string(),
    }
}

fn draft(venue: &Venue, date: &str, adults: u32, kids: u32) -> Value {
    json!({
        "adults": adults,
        "kids": kids,
        "package_id": venue.package_id,
        "food_option_id": venue.food_id,
        "event_date": date,
        "time_block_id": venue.block_id,
        "payment_method": "cash",
        "customer_name": "Ana Lopez",
        "customer_email": "ana@example.com",
        "child_name": "Sofi"
    })
}

#[tokio::test]
async fn test_booking_from_stored_draft() {
    let app = TestApp::new().await;
    let venue = setup_venue(&app, 1).await;
    let saturday = app.upcoming(6).to_string();

    let (status, _) = app.put("/api/v1/drafts/wizard-42", draft(&venue, &saturday, 10, 10)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, booking) = app.post("/api/v1/bookings", json!({ "draft_key": "wizard-42" })).await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {}", booking);
    assert_eq!(booking["status"], "PENDING");
    assert_eq!(booking["reference"].as_str().unwrap().len(), 8);
    assert_eq!(booking["start_time"], "14:00");
    assert_eq!(booking["end_time"], "18:00");
    assert_eq!(booking["child_name"], "Sofi");
    assert_eq!(booking["payment_method"], "cash");
    // Priced on the server from the catalog
    assert_eq!(booking["pricing"]["subtotal"], 3800.0);
    assert_eq!(booking["pricing"]["cash_discount_amount"], 190.0);
    assert_eq!(booking["pricing"]["total"], 3610.0);

    let (status, _) = app.get("/api/v1/drafts/wizard-42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, slots) = app.get(&format!("/api/v1/availability/slots?date={}", saturday)).await;
    assert_eq!(slots["slots"][0]["remaining_capacity"], 0);
    assert_eq!(slots["slots"][0]["current_capacity"], 1);

    let booking_id = booking["id"].as_str().unwrap();
    let (status, fetched) = app.admin_get(&format!("/api/v1/bookings/{}", booking_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["reference"], booking["reference"]);

    let (status, _) = app.get(&format!("/api/v1/bookings/{}", booking_id)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_guest_capacity_rules() {
    let app = TestApp::new().await;
    let venue = setup_venue(&app, 3).await;
    let saturday = app.upcoming(6).to_string();

    let (status, body) = app.post("/api/v1/bookings", json!({ "draft": draft(&venue, &saturday, 15, 10) })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "OVER_CAPACITY");

    let (status, body) = app.post("/api/v1/bookings", json!({ "draft": draft(&venue, &saturday, 5, 5) })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "CONFIRMATION_REQUIRED");

    let (status, _) = app.post("/api/v1/bookings", json!({
        "draft": draft(&venue, &saturday, 5, 5),
        "confirm_under_capacity": true
    })).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_full_slot_is_refused_until_cancelled() {
    let app = TestApp::new().await;
    let venue = setup_venue(&app, 2).await;
    let sunday = app.upcoming(0).to_string();

    let (status, first) = app.post("/api/v1/bookings", json!({ "draft": draft(&venue, &sunday, 10, 10) })).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app.post("/api/v1/bookings", json!({ "draft": draft(&venue, &sunday, 10, 10) })).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app.post("/api/v1/bookings", json!({ "draft": draft(&venue, &sunday, 10, 10) })).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let first_id = first["id"].as_str().unwrap();
    let (status, cancelled) = app.admin_put(&format!("/api/v1/bookings/{}/status", first_id), json!({ "status": "cancelled" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "CANCELLED");

    let (status, _) = app.post("/api/v1/bookings", json!({ "draft": draft(&venue, &sunday, 10, 10) })).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, listed) = app.admin_get(&format!("/api/v1/bookings?start={}&end={}", sunday, sunday)).await;
    assert_eq!(listed.as_array().unwrap().len(), 3);

    let (status, _) = app.admin_put(&format!("/api/v1/bookings/{}/status", first_id), json!({ "status": "ARCHIVED" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_booking_rejects_incomplete_or_closed_dates() {
    let app = TestApp::new().await;
    let venue = setup_venue(&app, 1).await;

    let (status, body) = app.post("/api/v1/bookings", json!({ "draft": { "adults": 10, "kids": 10 } })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("event_date"));
    assert!(message.contains("customer_email"));

    let (status, _) = app.post("/api/v1/bookings", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Block is not offered on Wednesdays
    let wednesday = app.upcoming(3).to_string();
    let (status, _) = app.post("/api/v1/bookings", json!({ "draft": draft(&venue, &wednesday, 10, 10) })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    app.admin_put("/api/v1/schedule/rest-days/6", json!({ "name": "Saturday off" })).await;
    let saturday = app.upcoming(6).to_string();
    let (status, _) = app.post("/api/v1/bookings", json!({ "draft": draft(&venue, &saturday, 10, 10) })).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let today = app.today().to_string();
    let (status, _) = app.post("/api/v1/bookings", json!({ "draft": draft(&venue, &today, 10, 10) })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upgrade_prices_are_taken_from_the_catalog() {
    let app = TestApp::new().await;
    let venue = setup_venue(&app, 1).await;
    let saturday = app.upcoming(6).to_string();

    let mut booking_draft = draft(&venue, &saturday, 10, 10);
    booking_draft["food_upgrades"] = json!([
        { "from_dish": "Tacos", "to_dish": "Pastor", "additional_price": -5000, "category": "adult" },
        { "from_dish": "Tacos", "to_dish": "Birria", "additional_price": 99, "category": "adult" }
    ]);

    let (status, booking) = app.post("/api/v1/bookings", json!({ "draft": booking_draft })).await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {}", booking);
    assert_eq!(booking["pricing"]["upgrades_price"], 15.0);
    assert_eq!(booking["pricing"]["subtotal"], 3815.0);
    assert_eq!(booking["pricing"]["cash_discount_amount"], 190.75);
    assert_eq!(booking["pricing"]["total"], 3624.25);

    let (_, stored) = app.admin_get(&format!("/api/v1/bookings/{}", booking["id"].as_str().unwrap())).await;
    assert_eq!(stored["pricing"]["upgrades_price"], 15.0);
    assert_eq!(stored["pricing"]["total"], 3624.25);
}

#[tokio::test]
async fn test_reactivating_a_cancelled_booking_respects_capacity() {
    let app = TestApp::new().await;
    let venue = setup_venue(&app, 1).await;
    let saturday = app.upcoming(6).to_string();

    let (_, first) = app.post("/api/v1/bookings", json!({ "draft": draft(&venue, &saturday, 10, 10) })).await;
    let first_status = format!("/api/v1/bookings/{}/status", first["id"].as_str().unwrap());
    let (status, _) = app.admin_put(&first_status, json!({ "status": "CANCELLED" })).await;
    assert_eq!(status, StatusCode::OK);

    let (status, second) = app.post("/api/v1/bookings", json!({ "draft": draft(&venue, &saturday, 10, 10) })).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app.admin_put(&first_status, json!({ "status": "CONFIRMED" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (_, unchanged) = app.admin_get(&format!("/api/v1/bookings/{}", first["id"].as_str().unwrap())).await;
    assert_eq!(unchanged["status"], "CANCELLED");

    let (_, slots) = app.get(&format!("/api/v1/availability/slots?date={}", saturday)).await;
    assert_eq!(slots["slots"][0]["current_capacity"], 1);

    // Confirming an already active booking needs no free seat
    let second_status = format!("/api/v1/bookings/{}/status", second["id"].as_str().unwrap());
    let (status, _) = app.admin_put(&second_status, json!({ "status": "CONFIRMED" })).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.admin_put(&second_status, json!({ "status": "CANCELLED" })).await;
    assert_eq!(status, StatusCode::OK);
    let (status, revived) = app.admin_put(&first_status, json!({ "status": "CONFIRMED" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(revived["status"], "CONFIRMED");
}
