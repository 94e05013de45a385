use std::sync::Arc;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use chrono::Utc;
use intake::{validate_all, AuditRequest, BookingRequest, IntakeForm, Submission, TimeSlot};
use serde::de::DeserializeOwned;
use serde_json::json;
use uuid::Uuid;

use crate::{
    AppState,
    config::store::StoreError,
    handlers::intake_dtos::{SlotsQuery, SlotsResponse},
    models::lead_models::{NewBooking, NewLead},
};

type ApiError = (StatusCode, Json<serde_json::Value>);

pub(crate) fn store_failure(e: StoreError) -> ApiError {
    match e {
        StoreError::SlotTaken => (
            StatusCode::CONFLICT,
            Json(json!({"error": "That time slot was just booked, please pick another"}))
        ),
        e => {
            tracing::error!("Store error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to save submission"}))
            )
        }
    }
}

/// Checks the envelope against the form's provenance and re-runs full
/// validation; the browser's checks are never trusted on their own.
fn accept<T: IntakeForm + DeserializeOwned>(submission: Submission) -> Result<T, ApiError> {
    let expected = T::PROVENANCE;
    if submission.collection != expected.collection
        || submission.source != expected.source
        || submission.status != expected.status
    {
        tracing::warn!(
            "Rejected submission tagged {}/{}/{}",
            submission.collection, submission.source, submission.status
        );
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Unexpected submission source"}))
        ));
    }

    let record: T = serde_json::from_value(submission.record).map_err(|e| (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": format!("Invalid record: {}", e)}))
    ))?;

    let errors = validate_all(&record);
    if !errors.is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"error": "Validation failed", "errors": errors}))
        ));
    }

    Ok(record)
}

fn created_at_now() -> i32 {
    epoch_seconds(Utc::now().timestamp())
}

// created_at is an INTEGER epoch column; saturate instead of wrapping
fn epoch_seconds(timestamp: i64) -> i32 {
    i32::try_from(timestamp).unwrap_or_else(|_| {
        tracing::error!("Timestamp {} does not fit created_at, storing i32::MAX", timestamp);
        i32::MAX
    })
}

pub async fn submit_lead(
    State(state): State<Arc<AppState>>,
    Json(submission): Json<Submission>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let audit: AuditRequest = accept(submission)?;

    let reference = Uuid::new_v4().to_string();
    let new_lead = NewLead::from_request(audit, reference.clone(), created_at_now());
    state.lead_repository.create_lead(new_lead).map_err(store_failure)?;

    tracing::info!("New lead {} stored", reference);
    Ok((StatusCode::CREATED, Json(json!({"reference": reference}))))
}

pub async fn submit_booking(
    State(state): State<Arc<AppState>>,
    Json(submission): Json<Submission>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let booking: BookingRequest = accept(submission)?;

    let today = Utc::now().date_naive();
    if booking.appointment_date.is_some_and(|date| date < today) {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"error": "Appointment date is in the past"}))
        ));
    }

    let reference = Uuid::new_v4().to_string();
    let new_booking = NewBooking::from_request(booking, reference.clone(), created_at_now())
        .ok_or((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"error": "Pick a date and a time slot"}))
        ))?;
    let slot = format!("{} {}", new_booking.appointment_date, new_booking.appointment_time);
    state.booking_repository.create_booking(new_booking).map_err(store_failure)?;

    tracing::info!("Booking {} stored for {}", reference, slot);
    Ok((StatusCode::CREATED, Json(json!({"reference": reference}))))
}

pub async fn get_available_slots(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<SlotsResponse>, ApiError> {
    if query.date < Utc::now().date_naive() {
        return Ok(Json(SlotsResponse { date: query.date, slots: Vec::new() }));
    }

    let booked = state.booking_repository
        .booked_slots(&query.date.format("%Y-%m-%d").to_string())
        .map_err(store_failure)?;
    let slots = TimeSlot::ALL
        .iter()
        .map(|slot| slot.label())
        .filter(|label| !booked.iter().any(|b| b == label))
        .map(str::to_string)
        .collect();

    Ok(Json(SlotsResponse { date: query.date, slots }))
}
