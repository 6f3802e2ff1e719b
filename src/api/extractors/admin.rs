use axum::{
    extract::{FromRequestParts, FromRef},
    http::{header, request::Parts, StatusCode},
};
use crate::state::AppState;
use std::sync::Arc;
use tracing::{Span, warn};

/// Gate for the admin panel routes: `Authorization: Bearer <ADMIN_API_KEY>`.
pub struct AdminUser;

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = parts.headers.get(header::AUTHORIZATION)
            .ok_or(StatusCode::UNAUTHORIZED)?
            .to_str()
            .map_err(|_| StatusCode::UNAUTHORIZED)?
            .strip_prefix("Bearer ")
            .ok_or(StatusCode::UNAUTHORIZED)?
            .trim();

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        if token.is_empty() || token != app_state.config.admin_api_key {
            warn!("Rejected admin request with invalid API key");
            return Err(StatusCode::UNAUTHORIZED);
        }

        Span::current().record("admin", true);
        Ok(AdminUser)
    }
}
