use axum::{
    extract::{Json as ExtractJson, Path, State},
    http::header::AUTHORIZATION,
    http::HeaderMap,
    response::Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::auth::SessionAuth;
use crate::error::ServiceError;
use crate::models::api::{Ack, JoinInfo, NewBookingRequest, SeededBooking, WaitingRoomStatus};
use crate::models::booking::{Booking, WaitingRoomState};
use crate::services::bookings::BookingStore;
use crate::services::urls::{join_url, waiting_room_url};

// AppState struct containing shared resources
pub struct AppState {
    pub store: Arc<BookingStore>,
    pub session_secret: String,
    pub webapp_url: String,
}

// Authenticated caller id from the Authorization header, if any. The header
// carries a platform session token; organizer checks happen per booking.
fn authenticated_user(state: &AppState, headers: &HeaderMap) -> Option<i64> {
    let header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?;
    SessionAuth::verify_token(&state.session_secret, token)
}

// Waiting room status endpoint. Read-only and unauthenticated: a missing
// booking or absent waiting room state reads as disabled, never as an error,
// which keeps the polling client simple.
pub async fn get_status(
    State(state): State<Arc<AppState>>,
    Path(booking_uid): Path<String>,
) -> Result<Json<WaitingRoomStatus>, ServiceError> {
    let booking = state.store.find_by_uid(&booking_uid).map_err(|e| {
        error!("Failed to look up booking {}: {}", booking_uid, e);
        ServiceError::Internal(e)
    })?;

    let status = match booking.and_then(|b| b.metadata.waiting_room) {
        Some(wr) => WaitingRoomStatus {
            enabled: wr.enabled,
            host_joined: wr.host_joined_at.is_some(),
        },
        None => WaitingRoomStatus::default(),
    };

    Ok(Json(status))
}

// Join info endpoint. A nonexistent booking yields a null-shaped payload
// rather than an error.
pub async fn get_join_info(
    State(state): State<Arc<AppState>>,
    Path(booking_uid): Path<String>,
) -> Result<Json<JoinInfo>, ServiceError> {
    let booking = state.store.find_by_uid(&booking_uid).map_err(|e| {
        error!("Failed to look up booking {}: {}", booking_uid, e);
        ServiceError::Internal(e)
    })?;

    let info = match booking {
        Some(booking) => JoinInfo {
            join_url: join_url(&booking),
            title: Some(booking.title.clone()),
            starts_at: booking.start_time.map(|t| t.to_rfc3339()),
        },
        None => JoinInfo::default(),
    };

    Ok(Json(info))
}

// Host presence endpoint. Organizer-only; extend to team membership if the
// platform schema grows one.
pub async fn mark_host_joined(
    State(state): State<Arc<AppState>>,
    Path(booking_uid): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Ack>, ServiceError> {
    let viewer_id = match authenticated_user(&state, &headers) {
        Some(id) => id,
        None => {
            warn!(
                "Unauthenticated host-joined call for booking {}",
                booking_uid
            );
            return Err(ServiceError::Unauthorized);
        }
    };

    let mut booking: Booking = state
        .store
        .find_by_uid(&booking_uid)
        .map_err(|e| {
            error!("Failed to look up booking {}: {}", booking_uid, e);
            ServiceError::Internal(e)
        })?
        .ok_or(ServiceError::NotFound)?;

    // Organizer check
    if booking.user_id != viewer_id {
        warn!(
            "User {} is not the organizer of booking {}",
            viewer_id, booking_uid
        );
        return Err(ServiceError::Forbidden);
    }

    // Enable the gate and stamp presence together; unrelated metadata keys
    // are preserved. Repeat calls refresh the timestamp.
    booking.metadata.waiting_room = Some(WaitingRoomState {
        enabled: true,
        host_joined_at: Some(Utc::now()),
    });

    state
        .store
        .update_metadata(&booking.uid, &booking.metadata)
        .map_err(|e| {
            error!(
                "Failed to record host presence for booking {}: {}",
                booking_uid, e
            );
            ServiceError::Internal(e)
        })?;

    info!("Recorded host presence for booking {}", booking_uid);

    Ok(Json(Ack { ok: true }))
}

// Booking seeding endpoint, exposed only outside production. Booking
// creation belongs to the scheduling platform; this route stands in for it
// during development and testing.
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    ExtractJson(request): ExtractJson<NewBookingRequest>,
) -> Result<Json<SeededBooking>, ServiceError> {
    info!("Received request to seed booking with uid {}", request.uid);

    let booking = state.store.insert(&request).map_err(|e| {
        error!("Failed to seed booking {}: {}", request.uid, e);
        ServiceError::Internal(e)
    })?;

    let attendee_url = waiting_room_url(&state.webapp_url, &booking.uid, false);
    let host_url = waiting_room_url(&state.webapp_url, &booking.uid, true);

    Ok(Json(SeededBooking {
        booking,
        attendee_url,
        host_url,
    }))
}
