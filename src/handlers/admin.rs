use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::booking::moderation::{self, BookingStats, BookingView, ProofView};
use crate::booking::Decision;
use crate::error::AppResult;
use crate::utils::jwt::Claims;
use crate::AppState;

// ============ Bookings Moderation ============

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub decision: Decision,
}

#[derive(Debug, Default, Deserialize)]
pub struct ConfirmQuery {
    #[serde(default)]
    pub confirm: bool,
}

/// List all bookings, newest first (admin)
pub async fn list_bookings(State(state): State<AppState>) -> AppResult<Json<Vec<BookingView>>> {
    Ok(Json(moderation::list_views(state.db.as_ref()).await?))
}

pub async fn booking_stats(State(state): State<AppState>) -> AppResult<Json<BookingStats>> {
    let bookings = moderation::list_bookings(state.db.as_ref()).await?;
    Ok(Json(BookingStats::from_bookings(&bookings)))
}

pub async fn get_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> AppResult<Json<BookingView>> {
    let booking = moderation::find_booking(state.db.as_ref(), booking_id).await?;
    Ok(Json(booking.into()))
}

/// Payment proof of a booking and whether it can still be decided
pub async fn booking_proof(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> AppResult<Json<ProofView>> {
    let booking = moderation::find_booking(state.db.as_ref(), booking_id).await?;
    Ok(Json(ProofView::from(&booking)))
}

/// Approve or reject a pending payment; responds with the refreshed list
pub async fn update_booking_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<Uuid>,
    Json(payload): Json<StatusRequest>,
) -> AppResult<Json<Vec<BookingView>>> {
    let status = moderation::decide(state.db.as_ref(), booking_id, payload.decision).await?;
    tracing::info!(booking_id = %booking_id, admin = %claims.sub, status = %status, "Booking moderated");

    Ok(Json(moderation::list_views(state.db.as_ref()).await?))
}

/// Delete a booking (requires `?confirm=true`); responds with the refreshed list
pub async fn delete_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    Query(query): Query<ConfirmQuery>,
) -> AppResult<Json<Vec<BookingView>>> {
    moderation::delete(state.db.as_ref(), booking_id, query.confirm).await?;
    Ok(Json(moderation::list_views(state.db.as_ref()).await?))
}
