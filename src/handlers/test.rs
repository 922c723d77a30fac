use axum::response::Json;
use serde::Serialize;
use serde_json::json;

use crate::models::api::NewBookingRequest;

// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

// Test data structure for sample payloads
#[derive(Debug, Serialize)]
pub struct TestBookingResponse {
    pub sample_booking_request: NewBookingRequest,
    pub sample_deep_link_booking: NewBookingRequest,
    pub api_endpoints: Vec<String>,
}

// Test endpoint that returns sample booking seed payloads
pub async fn test_booking() -> Json<TestBookingResponse> {
    // Plain https location with waiting room already enabled
    let sample = NewBookingRequest {
        uid: "demo-booking-1".to_string(),
        user_id: 101,
        title: "Weekly sync".to_string(),
        start_time: Some(chrono::Utc::now() + chrono::Duration::hours(1)),
        location: Some(json!("https://meet.example.com/weekly-sync")),
        metadata: Some(json!({ "waitingRoom": { "enabled": true } })),
    };

    // Zoom deep link location; join-info will normalize it to a web URL
    let deep_link = NewBookingRequest {
        uid: "demo-booking-2".to_string(),
        user_id: 101,
        title: "Design review".to_string(),
        start_time: Some(chrono::Utc::now() + chrono::Duration::hours(2)),
        location: Some(json!("zoommtg://zoom.us/join?confno=123456789&pwd=abc")),
        metadata: None,
    };

    let endpoints = vec![
        "GET /api/waiting-room/{booking_uid}/status - Poll waiting room state".to_string(),
        "GET /api/waiting-room/{booking_uid}/join-info - Resolve join URL, title, start time"
            .to_string(),
        "POST /api/waiting-room/{booking_uid}/host-joined - Record host presence (organizer only)"
            .to_string(),
        "GET /waiting-room/{booking_uid}?host=1 - Waiting room page".to_string(),
        "POST /bookings - Seed a booking (development only)".to_string(),
    ];

    Json(TestBookingResponse {
        sample_booking_request: sample,
        sample_deep_link_booking: deep_link,
        api_endpoints: endpoints,
    })
}
