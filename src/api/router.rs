use axum::{
    body::Body,
    extract::Request,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{availability, booking, catalog, draft, health, pricing, schedule, settings};
use crate::domain::models::catalog::{EventTheme, ExtraService, FoodOption, PackageOption};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Schedule configuration
        .route("/api/v1/schedule", get(schedule::get_schedule))
        .route("/api/v1/schedule/settings", put(schedule::update_settings))
        .route("/api/v1/schedule/time-blocks", post(schedule::create_time_block))
        .route("/api/v1/schedule/time-blocks/validate", post(schedule::dry_run_time_block))
        .route("/api/v1/schedule/time-blocks/{id}", put(schedule::update_time_block).delete(schedule::delete_time_block))
        .route("/api/v1/schedule/time-calculator", get(schedule::time_calculator))
        .route("/api/v1/schedule/rest-days/{day}", put(schedule::upsert_rest_day).delete(schedule::delete_rest_day))
        .route("/api/v1/schedule/releases", get(schedule::list_releases).post(schedule::create_release))
        .route("/api/v1/schedule/releases/{date}", delete(schedule::delete_release))

        // Availability
        .route("/api/v1/availability", get(availability::get_availability))
        .route("/api/v1/availability/slots", get(availability::get_slots))

        // Catalog
        .route("/api/v1/catalog/packages", get(catalog::list_items::<PackageOption>).post(catalog::create_item::<PackageOption>))
        .route("/api/v1/catalog/packages/{id}", put(catalog::update_item::<PackageOption>).delete(catalog::delete_item::<PackageOption>))
        .route("/api/v1/catalog/food-options", get(catalog::list_items::<FoodOption>).post(catalog::create_item::<FoodOption>))
        .route("/api/v1/catalog/food-options/{id}", put(catalog::update_item::<FoodOption>).delete(catalog::delete_item::<FoodOption>))
        .route("/api/v1/catalog/themes", get(catalog::list_items::<EventTheme>).post(catalog::create_item::<EventTheme>))
        .route("/api/v1/catalog/themes/{id}", put(catalog::update_item::<EventTheme>).delete(catalog::delete_item::<EventTheme>))
        .route("/api/v1/catalog/extras", get(catalog::list_items::<ExtraService>).post(catalog::create_item::<ExtraService>))
        .route("/api/v1/catalog/extras/{id}", put(catalog::update_item::<ExtraService>).delete(catalog::delete_item::<ExtraService>))

        // Payment settings
        .route("/api/v1/settings/payment", get(settings::get_payment_settings).put(settings::update_payment_settings))

        // Booking wizard
        .route("/api/v1/pricing/quote", post(pricing::quote))
        .route("/api/v1/drafts/{key}", get(draft::get_draft).put(draft::update_draft).delete(draft::delete_draft))
        .route("/api/v1/bookings", post(booking::create_booking).get(booking::list_bookings))
        .route("/api/v1/bookings/{id}", get(booking::get_booking))
        .route("/api/v1/bookings/{id}/status", put(booking::update_booking_status))

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
                        admin = tracing::field::Empty,
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
        .with_state(state)
}
