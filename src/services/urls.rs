use url::Url;

use crate::models::booking::{Booking, BookingLocation};

/// Normalize deep-link join URLs to browser-friendly links (avoids native
/// protocol-handler prompts on attendee machines). Extend as needed for
/// other providers.
///
/// Never fails: anything that does not parse as a URL, or carries an
/// unrecognized scheme, is returned unchanged.
pub fn normalize_join_url(raw: &str) -> String {
    let parsed = match Url::parse(raw) {
        Ok(u) => u,
        Err(_) => return raw.to_string(),
    };

    match parsed.scheme() {
        // Zoom native deep link -> web join URL
        // zoommtg://zoom.us/join?confno=XXXXXXXXXX&pwd=YYYY
        "zoommtg" => {
            let confno = parsed
                .query_pairs()
                .find(|(k, _)| k == "confno")
                .map(|(_, v)| v.into_owned());
            let id = confno
                .or_else(|| {
                    parsed
                        .path_segments()
                        .and_then(|segments| segments.last().map(String::from))
                })
                .unwrap_or_default();

            let pwd = parsed
                .query_pairs()
                .find(|(k, _)| k == "pwd")
                .map(|(_, v)| v.into_owned());

            match pwd {
                Some(pwd) => format!("https://zoom.us/w/{}?pwd={}", id, pwd),
                None => format!("https://zoom.us/w/{}", id),
            }
        }

        // Microsoft Teams app launcher: msteams://?url=<https link> carries
        // the web URL as a query parameter; unwrap it. Other msteams forms
        // fall through unchanged.
        "msteams" => parsed
            .query_pairs()
            .find(|(k, _)| k == "url")
            .map(|(_, v)| v.into_owned())
            .unwrap_or_else(|| raw.to_string()),

        // Unknown / already http(s)
        _ => raw.to_string(),
    }
}

/// Candidate raw join URL for a booking, checking the places the scheduling
/// platform is known to store meeting URLs. Precedence: explicit metadata
/// field, then the location string, then structured location sub-fields.
pub fn raw_join_url(booking: &Booking) -> Option<String> {
    if let Some(url) = &booking.metadata.video_call_url {
        if !url.is_empty() {
            return Some(url.clone());
        }
    }

    match &booking.location {
        Some(BookingLocation::Plain(s)) if !s.is_empty() => Some(s.clone()),
        Some(BookingLocation::Structured {
            link,
            meeting_url,
            url,
        }) => link
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(|| meeting_url.clone().filter(|s| !s.is_empty()))
            .or_else(|| url.clone().filter(|s| !s.is_empty())),
        _ => None,
    }
}

/// Browser-openable join URL for a booking, if any location data exists.
pub fn join_url(booking: &Booking) -> Option<String> {
    raw_join_url(booking).map(|raw| normalize_join_url(&raw))
}

/// Build the waiting room page URL for a booking against a base origin.
/// The host flag only marks which client fires the presence call; it is
/// not an authorization mechanism.
pub fn waiting_room_url(base: &str, booking_uid: &str, as_host: bool) -> String {
    let base = base.trim_end_matches('/');
    if as_host {
        format!("{}/waiting-room/{}?host=1", base, booking_uid)
    } else {
        format!("{}/waiting-room/{}", base, booking_uid)
    }
}

/// Base origin for page URLs, from WEBAPP_URL with a local default.
pub fn webapp_base_url() -> String {
    std::env::var("WEBAPP_URL")
        .map(|v| v.trim_end_matches('/').to_string())
        .unwrap_or_else(|_| "http://localhost:3000".to_string())
}
