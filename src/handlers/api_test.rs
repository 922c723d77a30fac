#[cfg(test)]
mod api_tests {
    use axum::http::{header, HeaderValue};
    use axum_test::{TestServer, TestServerConfig};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tempfile::{tempdir, TempDir};

    use crate::auth::SessionAuth;
    use crate::handlers::api::AppState;
    use crate::models::api::NewBookingRequest;
    use crate::routes::create_router;
    use crate::services::bookings::BookingStore;

    const TEST_SECRET: &str = "test_session_secret";

    // Helper function to set up a test server backed by a temp store
    fn setup_test_server() -> (TestServer, Arc<BookingStore>, TempDir) {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("test_bookings.csv");
        let store = Arc::new(BookingStore::new(csv_path.to_str().unwrap()));

        let app_state = Arc::new(AppState {
            store: Arc::clone(&store),
            session_secret: TEST_SECRET.to_string(),
            webapp_url: "http://localhost:3000".to_string(),
        });

        let router = create_router(app_state, false);

        let config = TestServerConfig::builder().mock_transport().build();
        let server = TestServer::new_with_config(router, config).unwrap();

        (server, store, dir)
    }

    fn seed_booking(store: &BookingStore, uid: &str, user_id: i64, location: Value) {
        store
            .insert(&NewBookingRequest {
                uid: uid.to_string(),
                user_id,
                title: "Planning call".to_string(),
                start_time: Some("2025-06-01T10:00:00Z".parse().unwrap()),
                location: Some(location),
                metadata: None,
            })
            .unwrap();
    }

    fn bearer(token: &str) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let (server, _store, _dir) = setup_test_server();

        let response = server.get("/health").await;
        assert_eq!(response.status_code().as_u16(), 200);
        assert_eq!(response.text(), "OK");
    }

    #[tokio::test]
    async fn test_status_defaults_to_disabled() {
        let (server, store, _dir) = setup_test_server();
        seed_booking(&store, "fresh-booking", 1, json!("https://meet.example.com/x"));

        let response = server.get("/api/waiting-room/fresh-booking/status").await;
        assert_eq!(response.status_code().as_u16(), 200);

        let body: Value = response.json();
        assert_eq!(body, json!({ "enabled": false, "hostJoined": false }));
    }

    #[tokio::test]
    async fn test_status_for_unknown_booking_is_disabled_not_error() {
        let (server, _store, _dir) = setup_test_server();

        let response = server.get("/api/waiting-room/no-such-booking/status").await;
        assert_eq!(response.status_code().as_u16(), 200);

        let body: Value = response.json();
        assert_eq!(body, json!({ "enabled": false, "hostJoined": false }));
    }

    #[tokio::test]
    async fn test_join_info_for_unknown_booking_is_null_shaped() {
        let (server, _store, _dir) = setup_test_server();

        let response = server
            .get("/api/waiting-room/no-such-booking/join-info")
            .await;
        assert_eq!(response.status_code().as_u16(), 200);

        let body: Value = response.json();
        assert_eq!(
            body,
            json!({ "joinUrl": null, "title": null, "startsAt": null })
        );
    }

    #[tokio::test]
    async fn test_join_info_normalizes_zoom_deep_link() {
        let (server, store, _dir) = setup_test_server();
        seed_booking(
            &store,
            "zoom-booking",
            1,
            json!("zoommtg://zoom.us/join?confno=123&pwd=abc"),
        );

        let response = server.get("/api/waiting-room/zoom-booking/join-info").await;
        assert_eq!(response.status_code().as_u16(), 200);

        let body: Value = response.json();
        assert_eq!(body["joinUrl"], json!("https://zoom.us/w/123?pwd=abc"));
        assert_eq!(body["title"], json!("Planning call"));
        assert_eq!(body["startsAt"], json!("2025-06-01T10:00:00+00:00"));
    }

    #[tokio::test]
    async fn test_mark_host_joined_requires_auth() {
        let (server, store, _dir) = setup_test_server();
        seed_booking(&store, "auth-booking", 1, json!("https://meet.example.com/x"));

        let response = server
            .post("/api/waiting-room/auth-booking/host-joined")
            .await;
        assert_eq!(response.status_code().as_u16(), 401);

        let body: Value = response.json();
        assert_eq!(body, json!({ "error": "UNAUTHORIZED" }));

        // No state was written
        let booking = store.find_by_uid("auth-booking").unwrap().unwrap();
        assert!(booking.metadata.waiting_room.is_none());
    }

    #[tokio::test]
    async fn test_mark_host_joined_unknown_booking_is_not_found() {
        let (server, _store, _dir) = setup_test_server();

        let token = SessionAuth::issue_token(TEST_SECRET, 1);
        let response = server
            .post("/api/waiting-room/ghost-booking/host-joined")
            .add_header(header::AUTHORIZATION, bearer(&token))
            .await;

        assert_eq!(response.status_code().as_u16(), 404);

        let body: Value = response.json();
        assert_eq!(body, json!({ "error": "NOT_FOUND" }));
    }

    #[tokio::test]
    async fn test_mark_host_joined_rejects_non_organizer() {
        let (server, store, _dir) = setup_test_server();
        seed_booking(&store, "owned-booking", 1, json!("https://meet.example.com/x"));

        // Authenticated as user 2, but user 1 owns the booking
        let token = SessionAuth::issue_token(TEST_SECRET, 2);
        let response = server
            .post("/api/waiting-room/owned-booking/host-joined")
            .add_header(header::AUTHORIZATION, bearer(&token))
            .await;

        assert_eq!(response.status_code().as_u16(), 403);

        let body: Value = response.json();
        assert_eq!(body, json!({ "error": "FORBIDDEN" }));

        // Stored state is untouched
        let booking = store.find_by_uid("owned-booking").unwrap().unwrap();
        assert!(booking.metadata.waiting_room.is_none());
    }

    #[tokio::test]
    async fn test_mark_host_joined_by_organizer_enables_gate() {
        let (server, store, _dir) = setup_test_server();
        seed_booking(&store, "host-booking", 7, json!("https://meet.example.com/x"));

        let token = SessionAuth::issue_token(TEST_SECRET, 7);
        let response = server
            .post("/api/waiting-room/host-booking/host-joined")
            .add_header(header::AUTHORIZATION, bearer(&token))
            .await;

        assert_eq!(response.status_code().as_u16(), 200);

        let body: Value = response.json();
        assert_eq!(body, json!({ "ok": true }));

        let status = server.get("/api/waiting-room/host-booking/status").await;
        let body: Value = status.json();
        assert_eq!(body, json!({ "enabled": true, "hostJoined": true }));
    }

    #[tokio::test]
    async fn test_mark_host_joined_twice_refreshes_timestamp() {
        let (server, store, _dir) = setup_test_server();
        seed_booking(&store, "twice-booking", 7, json!("https://meet.example.com/x"));

        let token = SessionAuth::issue_token(TEST_SECRET, 7);

        let first_response = server
            .post("/api/waiting-room/twice-booking/host-joined")
            .add_header(header::AUTHORIZATION, bearer(&token))
            .await;
        assert_eq!(first_response.status_code().as_u16(), 200);

        let first = store
            .find_by_uid("twice-booking")
            .unwrap()
            .unwrap()
            .metadata
            .waiting_room
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        let second_response = server
            .post("/api/waiting-room/twice-booking/host-joined")
            .add_header(header::AUTHORIZATION, bearer(&token))
            .await;
        assert_eq!(second_response.status_code().as_u16(), 200);

        let second = store
            .find_by_uid("twice-booking")
            .unwrap()
            .unwrap()
            .metadata
            .waiting_room
            .unwrap();

        assert!(second.enabled);
        assert!(second.host_joined_at.unwrap() > first.host_joined_at.unwrap());
    }

    #[tokio::test]
    async fn test_invalid_bearer_token_is_unauthorized() {
        let (server, store, _dir) = setup_test_server();
        seed_booking(&store, "bad-token", 7, json!("https://meet.example.com/x"));

        let response = server
            .post("/api/waiting-room/bad-token/host-joined")
            .add_header(
                header::AUTHORIZATION,
                HeaderValue::from_static("Bearer not-a-real-token"),
            )
            .await;

        assert_eq!(response.status_code().as_u16(), 401);
    }

    #[tokio::test]
    async fn test_seed_route_creates_booking() {
        let (server, store, _dir) = setup_test_server();

        let response = server
            .post("/bookings")
            .json(&json!({
                "uid": "seeded-booking",
                "userId": 3,
                "title": "Seeded",
                "location": "https://meet.example.com/seeded"
            }))
            .await;

        assert_eq!(response.status_code().as_u16(), 200);
        assert!(store.find_by_uid("seeded-booking").unwrap().is_some());
    }

    #[tokio::test]
    async fn test_production_mode_hides_seed_routes() {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("test_bookings.csv");
        let store = Arc::new(BookingStore::new(csv_path.to_str().unwrap()));

        let app_state = Arc::new(AppState {
            store,
            session_secret: TEST_SECRET.to_string(),
            webapp_url: "http://localhost:3000".to_string(),
        });

        let router = create_router(app_state, true);
        let config = TestServerConfig::builder().mock_transport().build();
        let server = TestServer::new_with_config(router, config).unwrap();

        let response = server
            .post("/bookings")
            .json(&json!({ "uid": "x", "userId": 1, "title": "x" }))
            .await;
        assert_eq!(response.status_code().as_u16(), 404);

        // Waiting room endpoints stay available
        let status = server.get("/api/waiting-room/x/status").await;
        assert_eq!(status.status_code().as_u16(), 200);
    }

    #[tokio::test]
    async fn test_waiting_room_page_renders() {
        let (server, store, _dir) = setup_test_server();
        seed_booking(&store, "page-booking", 1, json!("https://meet.example.com/x"));

        let response = server.get("/waiting-room/page-booking").await;
        assert_eq!(response.status_code().as_u16(), 200);

        let body = response.text();
        assert!(body.contains("Waiting for host"));
        assert!(body.contains("const isHost = false"));

        let host_view = server.get("/waiting-room/page-booking?host=1").await;
        assert!(host_view.text().contains("const isHost = true"));
    }
}
