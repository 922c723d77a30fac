use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Where a booking's meeting location lives. Upstream scheduling tools store
/// either a plain string (usually the join URL itself) or a structured object
/// whose URL may sit under `link`, `meetingUrl` or `url`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookingLocation {
    Plain(String),
    Structured {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        link: Option<String>,
        #[serde(
            default,
            rename = "meetingUrl",
            skip_serializing_if = "Option::is_none"
        )]
        meeting_url: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
}

// Waiting room state embedded in booking metadata. The recorder writes both
// fields together: host_joined_at set implies enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitingRoomState {
    pub enabled: bool,
    #[serde(
        default,
        rename = "hostJoinedAt",
        skip_serializing_if = "Option::is_none"
    )]
    pub host_joined_at: Option<DateTime<Utc>>,
}

/// Typed view of the booking's open-ended metadata document. Keys this
/// service does not own are preserved round-trip through `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingMetadata {
    #[serde(
        default,
        rename = "videoCallUrl",
        skip_serializing_if = "Option::is_none"
    )]
    pub video_call_url: Option<String>,
    #[serde(
        default,
        rename = "waitingRoom",
        skip_serializing_if = "Option::is_none"
    )]
    pub waiting_room: Option<WaitingRoomState>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// A scheduled meeting record owned by the host platform. This service only
/// reads bookings and patches the `waitingRoom` metadata sub-document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub uid: String,
    pub user_id: i64,
    pub title: String,
    pub start_time: Option<DateTime<Utc>>,
    pub location: Option<BookingLocation>,
    pub metadata: BookingMetadata,
}
