//! WebSocket telemetry replay endpoint.
//!
//! `GET /ws` upgrades the connection and replays the materialized record set
//! to that client from the beginning: one record per emission interval, sent
//! as a JSON text message with the wire field names. Every connection owns
//! its cursor and its ticker — two clients replaying concurrently never share
//! pacing or position, and a slow or closed peer affects nobody else.
//!
//! At end of data the emission simply stops; no completion frame is sent and
//! the socket stays open until the peer closes it. Record content is replayed
//! verbatim — validation belongs to the consuming decoder, not here.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{debug, info, warn};

use super::AppState;
use crate::WireRecord;

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/ws", get(upgrade_handler))
}

async fn upgrade_handler(
    ws: WebSocketUpgrade,
    State((records, config)): State<AppState>,
) -> Response {
    // ---
    let interval_ms = u64::from(config.emit_interval_ms);
    ws.on_upgrade(move |socket| replay_session(socket, records, interval_ms))
}

/// Drive one replay session until the peer goes away.
///
/// The cursor starts at 0 and advances once per tick; the `tokio::select!`
/// also polls the inbound side so a close frame (or transport failure) tears
/// the session down promptly, cancelling the ticker with it.
async fn replay_session(mut socket: WebSocket, records: Arc<Vec<WireRecord>>, interval_ms: u64) {
    // ---
    info!("Client connected, replaying {} records", records.len());

    let mut ticker = interval(Duration::from_millis(interval_ms));
    let mut cursor = 0usize;

    loop {
        tokio::select! {
            _ = ticker.tick(), if cursor < records.len() => {
                let Ok(text) = serde_json::to_string(&records[cursor]) else {
                    warn!("Failed to serialize record {}, skipping", cursor);
                    cursor += 1;
                    continue;
                };

                if socket.send(Message::Text(text.into())).await.is_err() {
                    debug!("Send failed at record {}, closing session", cursor);
                    break;
                }

                cursor += 1;
                if cursor == records.len() {
                    debug!("End of record set, emission stopped");
                }
            }
            message = socket.recv() => {
                match message {
                    // This stream is one-way; inbound payloads are ignored
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    info!("Client disconnected after {} records", cursor);
}
