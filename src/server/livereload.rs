//! Live-reload protocol: reload events, the browser client and its WebSocket.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::header,
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info};

use super::ServerState;

/// WebSocket endpoint streaming [`ReloadEvent`]s.
pub const SOCKET_PATH: &str = "/__livereload";

/// Endpoint serving [`CLIENT_SCRIPT`].
pub const SCRIPT_PATH: &str = "/__livereload.js";

/// Tag injected into every served HTML page.
pub const SCRIPT_TAG: &str = "<script src=\"/__livereload.js\"></script>";

/// What connected browsers should do after a rebuild.
///
/// ```
/// use assetpipe_cli::server::livereload::ReloadEvent;
///
/// let json = serde_json::to_string(&ReloadEvent::InjectCss).unwrap();
/// assert_eq!(json, r#"{"type":"inject_css"}"#);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReloadEvent {
    /// Stylesheets changed; swap them in place without a page reload.
    InjectCss,
    /// Scripts or markup changed; reload the page.
    FullReload,
}

/// Browser side of the protocol.
///
/// Reconnects after the socket closes, re-fetches every same-origin
/// stylesheet on `inject_css` and reloads on `full_reload`.
pub const CLIENT_SCRIPT: &str = r#"(function () {
  'use strict';
  var url = (location.protocol === 'https:' ? 'wss://' : 'ws://') + location.host + '/__livereload';

  function refreshStyles() {
    var links = document.querySelectorAll('link[rel="stylesheet"]');
    for (var i = 0; i < links.length; i++) {
      var link = links[i];
      var href = link.getAttribute('href');
      if (!href || /^(https?:)?\/\//.test(href)) continue;
      var clean = href.replace(/[?&]livereload=\d+/, '');
      var sep = clean.indexOf('?') === -1 ? '?' : '&';
      link.setAttribute('href', clean + sep + 'livereload=' + Date.now());
    }
  }

  function connect() {
    var socket = new WebSocket(url);
    socket.onmessage = function (msg) {
      var event;
      try { event = JSON.parse(msg.data); } catch (e) { return; }
      if (event.type === 'inject_css') refreshStyles();
      else if (event.type === 'full_reload') location.reload();
    };
    socket.onclose = function () { setTimeout(connect, 1000); };
  }

  connect();
})();
"#;

/// Insert [`SCRIPT_TAG`] before the last `</body>`, or append it when the
/// page has none.
#[must_use]
pub fn inject_livereload(html: &str) -> String {
    let mut out = String::with_capacity(html.len() + SCRIPT_TAG.len() + 1);
    match html.to_ascii_lowercase().rfind("</body>") {
        Some(idx) => {
            let (head, tail) = html.split_at(idx);
            out.push_str(head);
            out.push_str(SCRIPT_TAG);
            out.push_str(tail);
        }
        None => {
            out.push_str(html);
            out.push_str(SCRIPT_TAG);
            out.push('\n');
        }
    }
    out
}

/// Serve [`CLIENT_SCRIPT`].
pub async fn client_script() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "application/javascript; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        CLIENT_SCRIPT,
    )
}

/// WebSocket upgrade handler.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Forward reload events to one browser until either side goes away.
async fn handle_socket(socket: WebSocket, state: Arc<ServerState>) {
    let (mut sender, mut receiver) = socket.split();
    let mut events = state.subscribe();
    info!("live-reload client connected");

    let send_task = tokio::spawn(async move {
        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    debug!("live-reload client lagged by {skipped} events");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            let Ok(json) = serde_json::to_string(&event) else {
                continue;
            };
            if sender.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(msg)) = receiver.next().await {
        if let Message::Close(_) = msg {
            break;
        }
    }
    info!("live-reload client disconnected");
    send_task.abort();
}
