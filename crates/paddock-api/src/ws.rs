//! `WebSocket` handler for race position streaming.
//!
//! Clients connect to `GET /ws/race/{year}/{event_name}`. After the
//! upgrade the race session is loaded once and its position table is
//! serialized once; the same frame is then sent every
//! [`frame_interval`](crate::state::ApiSettings::frame_interval) until
//! the client goes away.
//!
//! If the session cannot be loaded the client receives the positions
//! error body followed by a close frame.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{CloseFrame, Message, Utf8Bytes, WebSocket, close_code};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use paddock_types::PositionFrame;
use tracing::{debug, info, warn};

use crate::error::{ApiError, Cause, POSITIONS_FAILURE, parse_year};
use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming position frames.
///
/// # Route
///
/// `GET /ws/race/{year}/{event_name}`
pub async fn ws_race(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path((year, event_name)): Path<(String, String)>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state, year, event_name))
}

/// Load the frame the socket will repeat.
async fn load_frame(state: &AppState, year: &str, event_name: &str) -> Result<PositionFrame, Cause> {
    let year = parse_year(year)?;
    let race = state.loader.load_race(year, event_name).await?;
    Ok(state.loader.position_frame(&race).await?)
}

/// Handle the `WebSocket` lifecycle: load once, then push the frame on
/// every interval tick while watching the client half for close.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>, year: String, event_name: String) {
    debug!(year, event = event_name, "WebSocket client connected");

    let frame = match load_frame(&state, &year, &event_name).await {
        Ok(frame) => frame,
        Err(cause) => {
            let err = ApiError::new(POSITIONS_FAILURE, cause);
            warn!(
                status = err.status().as_u16(),
                cause = %err.cause(),
                "WebSocket session load failed: {}",
                err.message()
            );
            send_error_and_close(&mut socket, &err).await;
            return;
        }
    };

    let payload: Utf8Bytes = match serde_json::to_string(&frame) {
        Ok(json) => json.into(),
        Err(e) => {
            warn!("Failed to serialize position frame: {e}");
            return;
        }
    };

    info!(
        year,
        event = event_name,
        drivers = frame.len(),
        bytes = payload.as_str().len(),
        "Streaming race positions"
    );

    stream_frames(socket, payload, state.settings.frame_interval).await;
}

async fn stream_frames(mut socket: WebSocket, payload: Utf8Bytes, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    let mut sent: u64 = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if socket.send(Message::Text(payload.clone())).await.is_err() {
                    debug!(frames = sent, "WebSocket client disconnected (send failed)");
                    return;
                }
                sent = sent.saturating_add(1);
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(frames = sent, "WebSocket client disconnected");
                        return;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!(frames = sent, "WebSocket client disconnected (pong failed)");
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        debug!("WebSocket error: {e}");
                        return;
                    }
                    _ => {
                        // Client text/binary is ignored.
                    }
                }
            }
        }
    }
}

async fn send_error_and_close(socket: &mut WebSocket, err: &ApiError) {
    if let Ok(json) = serde_json::to_string(&err.body()) {
        let _ = socket.send(Message::Text(json.into())).await;
    }
    let close = CloseFrame {
        code: close_code::ERROR,
        reason: Utf8Bytes::from_static(err.message()),
    };
    let _ = socket.send(Message::Close(Some(close))).await;
}
