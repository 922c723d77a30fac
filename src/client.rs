use futures::future::try_join;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::models::api::{Ack, JoinInfo, WaitingRoomStatus};

/// Default status poll period, matching the waiting room page.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Where the gate stands for a viewer. `Disabled` and `HostPresent` are
/// terminal; `Waiting` re-evaluates on every poll tick.
#[derive(Debug, Clone, PartialEq)]
pub enum GateState {
    Loading,
    Disabled { join_url: Option<String> },
    Waiting,
    HostPresent { join_url: Option<String> },
}

impl GateState {
    /// Evaluate the gate from whichever fetches have resolved so far. The
    /// status poll and the one-shot join-info fetch are unordered, so either
    /// side may still be missing.
    pub fn evaluate(status: Option<&WaitingRoomStatus>, info: Option<&JoinInfo>) -> GateState {
        match (status, info) {
            (Some(status), Some(info)) => {
                if !status.enabled {
                    GateState::Disabled {
                        join_url: info.join_url.clone(),
                    }
                } else if status.host_joined {
                    GateState::HostPresent {
                        join_url: info.join_url.clone(),
                    }
                } else {
                    GateState::Waiting
                }
            }
            _ => GateState::Loading,
        }
    }
}

/// Programmatic consumer of the waiting room endpoints.
///
/// Mirrors the page's behavior: join info is fetched once, status is polled
/// on a fixed interval, and `wait_for_host` resolves once the gate reaches a
/// terminal state.
pub struct WaitingRoomClient {
    client: Client,
    base_url: String,
    poll_interval: Duration,
}

impl WaitingRoomClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Fetch the current waiting room status for a booking
    pub async fn get_status(&self, booking_uid: &str) -> Result<WaitingRoomStatus, reqwest::Error> {
        let url = format!("{}/api/waiting-room/{}/status", self.base_url, booking_uid);
        debug!("Fetching waiting room status from {}", url);

        let res = self.client.get(&url).send().await?;
        res.json::<WaitingRoomStatus>().await
    }

    /// Fetch join URL, title and start time for a booking
    pub async fn get_join_info(&self, booking_uid: &str) -> Result<JoinInfo, reqwest::Error> {
        let url = format!(
            "{}/api/waiting-room/{}/join-info",
            self.base_url, booking_uid
        );
        debug!("Fetching join info from {}", url);

        let res = self.client.get(&url).send().await?;
        res.json::<JoinInfo>().await
    }

    /// Record host presence for a booking. Requires the organizer's session
    /// token; the server enforces the ownership check.
    pub async fn mark_host_joined(
        &self,
        booking_uid: &str,
        session_token: &str,
    ) -> Result<bool, reqwest::Error> {
        let url = format!(
            "{}/api/waiting-room/{}/host-joined",
            self.base_url, booking_uid
        );
        info!("Recording host presence for booking {}", booking_uid);

        let res = self
            .client
            .post(&url)
            .bearer_auth(session_token)
            .send()
            .await?
            .error_for_status()?;

        let ack = res.json::<Ack>().await?;
        Ok(ack.ok)
    }

    /// Poll until the gate reaches a terminal state.
    ///
    /// Join info is fetched once, concurrently with the first status fetch.
    /// After that the status is re-fetched on the poll interval; a failed
    /// poll is skipped and the next tick retries naturally.
    pub async fn wait_for_host(&self, booking_uid: &str) -> Result<GateState, reqwest::Error> {
        let (mut status, info) = try_join(
            self.get_status(booking_uid),
            self.get_join_info(booking_uid),
        )
        .await?;

        loop {
            match GateState::evaluate(Some(&status), Some(&info)) {
                GateState::Waiting => {
                    tokio::time::sleep(self.poll_interval).await;
                    match self.get_status(booking_uid).await {
                        Ok(next) => status = next,
                        Err(e) => {
                            warn!("Status poll for booking {} failed: {}", booking_uid, e);
                        }
                    }
                }
                terminal => return Ok(terminal),
            }
        }
    }
}
