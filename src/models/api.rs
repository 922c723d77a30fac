use serde::{Deserialize, Serialize};

// Response for the status polling endpoint. Both fields default to false
// when the booking or its waiting room state is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitingRoomStatus {
    pub enabled: bool,
    pub host_joined: bool,
}

// Response for the join-info endpoint. All fields null for an unknown
// booking; read endpoints never error on missing data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinInfo {
    pub join_url: Option<String>,
    pub title: Option<String>,
    pub starts_at: Option<String>,
}

// Acknowledgment for the host-presence write endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct Ack {
    pub ok: bool,
}

/// Response for the development-only seeding route: the stored booking plus
/// ready-made waiting room page URLs for both sides of the gate.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeededBooking {
    pub booking: crate::models::booking::Booking,
    pub attendee_url: String,
    pub host_url: String,
}

/// Payload for the development-only booking seeding route.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBookingRequest {
    pub uid: String,
    pub user_id: i64,
    pub title: String,
    #[serde(default)]
    pub start_time: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub location: Option<serde_json::Value>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}
