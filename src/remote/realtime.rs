//! Realtime change feed over the backend's phoenix-framed WebSocket.
//!
//! The feed joins one topic (`realtime:public:bookmarks`, event filter `*`)
//! and forwards every INSERT/UPDATE/DELETE frame as a [`ChangeEvent`]. The
//! connection is collaborator-internal plumbing: if it drops, the feed task
//! reconnects after a fixed delay so liveness survives transient outages.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::sync::broadcast;
use tokio_tungstenite::tungstenite::Message;

use crate::config::RemoteConfig;
use crate::remote::client::BOOKMARKS_TABLE;
use crate::types::errors::RealtimeError;
use crate::types::event::{ChangeEvent, ChangeKind};

/// Interval between phoenix heartbeat frames.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Delay before reconnecting after a dropped connection.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// The topic carrying changes for the bookmarks table.
pub fn bookmarks_topic() -> String {
    format!("realtime:public:{}", BOOKMARKS_TABLE)
}

/// WebSocket endpoint derived from the project base URL.
pub fn websocket_url(config: &RemoteConfig) -> String {
    let ws_base = if let Some(rest) = config.base_url.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = config.base_url.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        config.base_url.clone()
    };
    format!(
        "{}/realtime/v1/websocket?apikey={}&vsn=1.0.0",
        ws_base, config.api_key
    )
}

/// The frame sent to join the bookmarks topic with event filter `*`.
pub fn join_frame() -> String {
    json!({
        "topic": bookmarks_topic(),
        "event": "phx_join",
        "payload": {},
        "ref": "1",
    })
    .to_string()
}

fn heartbeat_frame(reference: u64) -> String {
    json!({
        "topic": "phoenix",
        "event": "heartbeat",
        "payload": {},
        "ref": reference.to_string(),
    })
    .to_string()
}

/// Parses an inbound frame into a [`ChangeEvent`].
///
/// Frames for other topics, phoenix replies, and heartbeat acknowledgements
/// yield `None`.
pub fn parse_change_event(text: &str) -> Option<ChangeEvent> {
    let frame: serde_json::Value = serde_json::from_str(text).ok()?;
    let topic = frame.get("topic")?.as_str()?;
    let table = topic.strip_prefix("realtime:public:")?;
    if table != BOOKMARKS_TABLE {
        return None;
    }
    let kind = ChangeKind::from_wire(frame.get("event")?.as_str()?)?;
    Some(ChangeEvent {
        kind,
        table: table.to_string(),
    })
}

/// Feed task: connect, join, pump frames into the broadcast channel, and
/// reconnect on failure. Runs until aborted.
pub async fn run_feed(config: RemoteConfig, tx: broadcast::Sender<ChangeEvent>) {
    loop {
        match connect_and_pump(&config, &tx).await {
            Ok(()) => return,
            Err(e) => {
                tracing::warn!("realtime feed dropped: {}", e);
            }
        }
        tokio::time::sleep(RECONNECT_DELAY).await;
    }
}

async fn connect_and_pump(
    config: &RemoteConfig,
    tx: &broadcast::Sender<ChangeEvent>,
) -> Result<(), RealtimeError> {
    let url = websocket_url(config);
    let (stream, _response) = tokio_tungstenite::connect_async(&url)
        .await
        .map_err(|e| RealtimeError::ConnectFailed(e.to_string()))?;
    let (mut write, mut read) = stream.split();

    write
        .send(Message::Text(join_frame().into()))
        .await
        .map_err(|e| RealtimeError::Protocol(e.to_string()))?;
    tracing::debug!(topic = %bookmarks_topic(), "realtime topic joined");

    let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
    heartbeat.tick().await; // first tick fires immediately
    let mut heartbeat_ref: u64 = 1;

    loop {
        tokio::select! {
            _ = heartbeat.tick() => {
                heartbeat_ref += 1;
                write
                    .send(Message::Text(heartbeat_frame(heartbeat_ref).into()))
                    .await
                    .map_err(|e| RealtimeError::Protocol(e.to_string()))?;
            }
            frame = read.next() => {
                let frame = frame
                    .ok_or(RealtimeError::Closed)?
                    .map_err(|e| RealtimeError::Protocol(e.to_string()))?;
                match frame {
                    Message::Text(text) => {
                        if let Some(event) = parse_change_event(&text) {
                            tracing::debug!(kind = ?event.kind, "remote change received");
                            let _ = tx.send(event);
                        }
                    }
                    Message::Ping(payload) => {
                        write
                            .send(Message::Pong(payload))
                            .await
                            .map_err(|e| RealtimeError::Protocol(e.to_string()))?;
                    }
                    Message::Close(_) => return Err(RealtimeError::Closed),
                    _ => {}
                }
            }
        }
    }
}
