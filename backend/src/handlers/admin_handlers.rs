use std::sync::Arc;
use axum::{
    Json,
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use serde_json::json;

use crate::{
    AppState,
    handlers::intake_dtos::{BookingResponse, LeadResponse, StatusUpdateRequest},
    handlers::lead_handlers::store_failure,
};

type ApiError = (StatusCode, Json<serde_json::Value>);

pub async fn require_admin_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let key = request
        .headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "));

    match key {
        Some(key) if !key.is_empty() && key == state.admin_api_key => Ok(next.run(request).await),
        Some(_) => {
            tracing::warn!("Admin request with a wrong key");
            Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Invalid admin key"}))
            ))
        }
        None => Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "No authorization token provided"}))
        )),
    }
}

pub async fn get_leads(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LeadResponse>>, ApiError> {
    let leads = state.lead_repository.get_all_leads().map_err(store_failure)?;
    Ok(Json(leads.into_iter().map(LeadResponse::from).collect()))
}

pub async fn get_bookings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let bookings = state.booking_repository.get_all_bookings().map_err(store_failure)?;
    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}

pub async fn update_lead_status(
    State(state): State<Arc<AppState>>,
    Path(reference): Path<String>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let updated = state.lead_repository
        .update_status(&reference, request.status.as_str())
        .map_err(store_failure)?;

    if !updated {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Lead not found"}))
        ));
    }

    tracing::info!("Lead {} moved to {}", reference, request.status.as_str());
    Ok(Json(json!({
        "reference": reference,
        "status": request.status.as_str(),
    })))
}
