use axum::{
    extract::{Path, Query, State},
    response::Html,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::handlers::api::AppState;

#[derive(Debug, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub host: Option<String>,
}

/// Waiting room display page.
///
/// Serves the attendee-facing gate: status is polled every 2 seconds,
/// join info is fetched once, and the page redirects itself when the host
/// is present. A manual link covers browsers that block the redirect.
///
/// `?host=1` makes the page fire the host-presence call once on load. The
/// flag only selects which client reports presence; authorization is the
/// server-side organizer check on the recording endpoint.
pub async fn waiting_room_page(
    State(_state): State<Arc<AppState>>,
    Path(booking_uid): Path<String>,
    Query(params): Query<PageParams>,
) -> Html<String> {
    let is_host = params.host.as_deref() == Some("1");

    info!(
        "Serving waiting room page for booking {} (host={})",
        booking_uid, is_host
    );

    // Embed as JSON literals so uids cannot break out of the script block
    let uid_js = serde_json::to_string(&booking_uid).unwrap_or_else(|_| "\"\"".to_string());

    Html(format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Waiting room</title>
<style>
  body {{ margin: 0; font-family: system-ui, sans-serif; background: #0f0f0f; color: #eee; }}
  .wrap {{ min-height: 100vh; display: grid; place-items: center; }}
  .card {{ max-width: 28rem; width: 100%; padding: 2rem; text-align: center;
           background: #1a1a1a; border-radius: 1rem; box-shadow: 0 8px 30px rgba(0,0,0,.5); }}
  .muted {{ color: #999; margin-top: .5rem; }}
  .link {{ display: inline-block; margin-top: 1.5rem; padding: .5rem 1rem;
           border: 1px solid #444; border-radius: .5rem; color: #eee; text-decoration: none; }}
  .hidden {{ display: none; }}
  .pulse {{ width: 2.5rem; height: 2.5rem; margin: 0 auto 1rem; border: 2px solid #555;
            border-radius: 50%; animation: pulse 1.5s ease-in-out infinite; }}
  @keyframes pulse {{ 50% {{ opacity: .3; }} }}
</style>
</head>
<body>
<div class="wrap">
  <div id="view-loading" class="card"><p class="muted">Loading&hellip;</p></div>
  <div id="view-disabled" class="card hidden">
    <h2>Waiting room is off</h2>
    <p class="muted">This meeting doesn&rsquo;t use a waiting room.</p>
    <a id="disabled-link" class="link hidden" href="#">Open meeting</a>
  </div>
  <div id="view-waiting" class="card hidden">
    <div class="pulse"></div>
    <h2>Waiting for host&hellip;</h2>
    <p class="muted">We&rsquo;ll let you in as soon as they arrive.</p>
    <p id="host-note" class="muted hidden">You&rsquo;re marked as the host. Once you open the
      meeting, attendees will be admitted.</p>
  </div>
  <div id="view-present" class="card hidden">
    <h2>Host is here</h2>
    <p class="muted">Joining your call&hellip;</p>
    <a id="present-link" class="link hidden" href="#">Open meeting</a>
  </div>
</div>
<script>
  const bookingUid = {uid_js};
  const isHost = {is_host};
  const pollMs = 2000;

  let status = null;
  let info = null;
  let redirected = false;

  function show(id) {{
    for (const view of ["loading", "disabled", "waiting", "present"]) {{
      document.getElementById("view-" + view).classList.toggle("hidden", view !== id);
    }}
  }}

  function render() {{
    if (!status || !info) return;
    if (!status.enabled) {{
      if (info.joinUrl) {{
        const link = document.getElementById("disabled-link");
        link.href = info.joinUrl;
        link.classList.remove("hidden");
      }}
      show("disabled");
      return;
    }}
    if (!status.hostJoined) {{
      if (isHost) document.getElementById("host-note").classList.remove("hidden");
      show("waiting");
      return;
    }}
    if (info.joinUrl) {{
      const link = document.getElementById("present-link");
      link.href = info.joinUrl;
      link.classList.remove("hidden");
      if (!redirected) {{
        redirected = true;
        window.location.href = info.joinUrl;
      }}
    }}
    show("present");
  }}

  async function fetchStatus() {{
    const res = await fetch(`/api/waiting-room/${{encodeURIComponent(bookingUid)}}/status`);
    status = await res.json();
    render();
  }}

  async function fetchInfo() {{
    const res = await fetch(`/api/waiting-room/${{encodeURIComponent(bookingUid)}}/join-info`);
    info = await res.json();
    render();
  }}

  // Host fires the presence call exactly once per page load; failures are
  // not branched on here (the server enforces the organizer check).
  if (isHost) {{
    fetch(`/api/waiting-room/${{encodeURIComponent(bookingUid)}}/host-joined`, {{
      method: "POST",
      headers: {{ "Authorization": "Bearer " + (localStorage.getItem("session_token") || "") }}
    }});
  }}

  fetchInfo();
  fetchStatus();
  setInterval(fetchStatus, pollMs);
</script>
</body>
</html>
"##,
        uid_js = uid_js,
        is_host = is_host,
    ))
}
