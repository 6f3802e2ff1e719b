mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::TestApp;
use party_venue_backend::domain::models::draft::{ReservationDraft, StoredDraft};
use serde_json::json;

#[tokio::test]
async fn test_draft_steps_accumulate() {
    let app = TestApp::new().await;

    let (status, _) = app.get("/api/v1/drafts/session-1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.put("/api/v1/drafts/session-1", json!({ "adults": "12", "kids": "abc" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["draft"]["adults"], 12);
    assert_eq!(body["draft"]["kids"], 0);

    app.put("/api/v1/drafts/session-1", json!({
        "food_option_id": "taquiza",
        "food_upgrades": [
            { "from_dish": "Tacos", "to_dish": "Arrachera", "additional_price": 150, "category": "adult" },
            { "from_dish": "Tacos", "to_dish": "Pastor", "additional_price": 90, "category": "adult" }
        ]
    })).await;

    let (_, body) = app.get("/api/v1/drafts/session-1").await;
    let upgrades = body["draft"]["food_upgrades"].as_array().unwrap();
    assert_eq!(upgrades.len(), 1);
    assert_eq!(upgrades[0]["to_dish"], "Pastor");
    assert_eq!(body["draft"]["adults"], 12);

    let (_, body) = app.put("/api/v1/drafts/session-1", json!({ "food_option_id": "buffet" })).await;
    assert!(body["draft"]["food_upgrades"].as_array().unwrap().is_empty());

    let saved_at = chrono::DateTime::parse_from_rfc3339(body["saved_at"].as_str().unwrap()).unwrap();
    let expires_at = chrono::DateTime::parse_from_rfc3339(body["expires_at"].as_str().unwrap()).unwrap();
    assert_eq!(expires_at - saved_at, Duration::hours(24));

    let (status, _) = app.delete("/api/v1/drafts/session-1").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get("/api/v1/drafts/session-1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_draft_takes_cash_discount_snapshot() {
    let app = TestApp::new().await;
    app.admin_put("/api/v1/settings/payment", json!({
        "cash_discount": { "enabled": true, "percentage": 5, "applies_to": "remaining" }
    })).await;

    let (_, body) = app.put("/api/v1/drafts/cash-flow", json!({ "payment_method": "cash" })).await;
    assert_eq!(body["draft"]["cash_discount"]["percentage"], 5.0);

    let (_, body) = app.put("/api/v1/drafts/cash-flow", json!({ "payment_method": "card" })).await;
    assert!(body["draft"]["cash_discount"].is_null());

    // Client supplied snapshots are ignored
    let (_, body) = app.put("/api/v1/drafts/cash-flow", json!({
        "payment_method": "transfer",
        "cash_discount": { "enabled": true, "percentage": 90 }
    })).await;
    assert!(body["draft"]["cash_discount"].is_null());
}

#[tokio::test]
async fn test_expired_draft_is_discarded() {
    let app = TestApp::new().await;

    let stale = StoredDraft {
        key: "stale".into(),
        draft: ReservationDraft { adults: 5, ..Default::default() },
        timestamp: Utc::now() - Duration::hours(25),
    };
    app.state.draft_repo.save(&stale).await.unwrap();

    let fresh = StoredDraft::new("fresh".into(), ReservationDraft { adults: 7, ..Default::default() });
    app.state.draft_repo.save(&fresh).await.unwrap();

    let (status, _) = app.get("/api/v1/drafts/stale").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(app.state.draft_repo.find("stale").await.unwrap().is_none());

    let (status, body) = app.get("/api/v1/drafts/fresh").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["draft"]["adults"], 7);

    // A new edit under an expired key starts over
    app.state.draft_repo.save(&stale).await.unwrap();
    let (_, body) = app.put("/api/v1/drafts/stale", json!({ "kids": 3 })).await;
    assert_eq!(body["draft"]["adults"], 0);
    assert_eq!(body["draft"]["kids"], 3);
}

#[tokio::test]
async fn test_purge_removes_only_expired_drafts() {
    let app = TestApp::new().await;

    let stale = StoredDraft {
        key: "old".into(),
        draft: ReservationDraft::default(),
        timestamp: Utc::now() - Duration::hours(30),
    };
    app.state.draft_repo.save(&stale).await.unwrap();
    app.state.draft_repo.save(&StoredDraft::new("new".into(), ReservationDraft::default())).await.unwrap();

    let purged = app.state.draft_repo.purge_older_than(Utc::now() - app.state.config.draft_ttl()).await.unwrap();
    assert_eq!(purged, 1);
    assert!(app.state.draft_repo.find("new").await.unwrap().is_some());
}

#[tokio::test]
async fn test_rejects_malformed_draft_keys() {
    let app = TestApp::new().await;
    let (status, _) = app.put("/api/v1/drafts/bad%20key", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
