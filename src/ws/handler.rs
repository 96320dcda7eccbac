//! Live socket upgrade handler

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::app::AppState;
use crate::game::controller::SessionChannels;
use crate::game::CommandSink;
use crate::util::rate_limit::SessionRateLimiter;
use crate::util::time::unix_millis;
use crate::ws::protocol::{ClientMsg, ServerMsg};
use crate::ws::session::GestureSession;

/// Query parameters for the live socket
#[derive(Debug, Deserialize)]
pub struct LiveQuery {
    /// Opaque CSRF token from the page; carried, never interpreted
    #[serde(rename = "_csrf_token")]
    pub csrf_token: Option<String>,
}

/// Live socket upgrade handler
pub async fn live_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<LiveQuery>,
    State(state): State<AppState>,
) -> Response {
    let session_id = Uuid::new_v4();
    info!(
        session_id = %session_id,
        has_csrf_token = query.csrf_token.is_some(),
        "Live socket upgrade"
    );
    ws.on_upgrade(move |socket| handle_socket(socket, session_id, state))
}

/// Handle the upgraded live socket
async fn handle_socket(socket: WebSocket, session_id: Uuid, state: AppState) {
    let (mut ws_sink, ws_stream) = socket.split();

    let welcome = ServerMsg::Welcome {
        session_id,
        server_time: unix_millis(),
        min_swipe_distance: state.config.min_swipe_distance,
    };

    if let Err(e) = send_msg(&mut ws_sink, &welcome).await {
        error!(session_id = %session_id, error = %e, "Failed to send welcome");
        return;
    }

    let channels = state.controller.register_session(session_id);

    run_session(session_id, &state, ws_sink, ws_stream, channels).await;

    state.controller.unregister_session(session_id);

    info!(session_id = %session_id, "Live socket closed");
}

/// Run the session with split read/write
async fn run_session(
    session_id: Uuid,
    state: &AppState,
    mut ws_sink: futures::stream::SplitSink<WebSocket, Message>,
    mut ws_stream: futures::stream::SplitStream<WebSocket>,
    channels: SessionChannels,
) {
    let SessionChannels {
        sink,
        outbound_tx,
        mut outbound_rx,
    } = channels;

    let rate_limiter = SessionRateLimiter::new();
    let mut session = GestureSession::new(
        session_id,
        sink,
        state.config.min_swipe_distance,
        state.config.enable_debug_commands,
    );

    // Writer task: controller replies and direct replies -> socket
    let writer_handle = tokio::spawn(async move {
        while let Some(msg) = outbound_rx.recv().await {
            if let Err(e) = send_msg(&mut ws_sink, &msg).await {
                debug!(session_id = %session_id, error = %e, "Live socket send failed");
                break;
            }
        }
    });

    // Reader loop: socket -> gesture session
    while let Some(result) = ws_stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                let reply = process_text(session_id, &mut session, &rate_limiter, &text);

                if let Some(reply) = reply {
                    if !queue_reply(&outbound_tx, reply) {
                        break;
                    }
                }
            }
            Ok(Message::Binary(_)) => {
                warn!(session_id = %session_id, "Received binary message, ignoring");
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                debug!(session_id = %session_id, "Received control frame");
            }
            Ok(Message::Close(_)) => {
                info!(session_id = %session_id, "Client initiated close");
                break;
            }
            Err(e) => {
                error!(session_id = %session_id, error = %e, "Live socket error");
                break;
            }
        }
    }

    writer_handle.abort();
}

/// Parse and dispatch one text frame. Returns the direct reply, if any.
fn process_text<S: CommandSink>(
    session_id: Uuid,
    session: &mut GestureSession<S>,
    rate_limiter: &SessionRateLimiter,
    text: &str,
) -> Option<ServerMsg> {
    let msg = match serde_json::from_str::<ClientMsg>(text) {
        Ok(msg) => msg,
        Err(e) => {
            warn!(session_id = %session_id, error = %e, "Failed to parse client message");
            return Some(ServerMsg::error("bad_message", e.to_string()));
        }
    };

    if msg.counts_toward_rate_limit() && !rate_limiter.check() {
        warn!(session_id = %session_id, "Rate limited client message");
        if matches!(msg, ClientMsg::TouchStart { .. }) {
            // The previous start must not pair with a later touch end
            session.cancel_gesture();
        }
        return Some(ServerMsg::error("rate_limited", "Too many messages"));
    }

    session.dispatch(msg)
}

/// Queue a direct reply. Returns false once the writer is gone.
fn queue_reply(outbound_tx: &mpsc::Sender<ServerMsg>, reply: ServerMsg) -> bool {
    match outbound_tx.try_send(reply) {
        Ok(()) => true,
        Err(mpsc::error::TrySendError::Full(_)) => {
            warn!("Outbound queue full, dropping reply");
            true
        }
        Err(mpsc::error::TrySendError::Closed(_)) => false,
    }
}

/// Send a message over the socket
async fn send_msg(
    sink: &mut futures::stream::SplitSink<WebSocket, Message>,
    msg: &ServerMsg,
) -> Result<(), String> {
    let json = serde_json::to_string(msg).map_err(|e| e.to_string())?;
    sink.send(Message::Text(json))
        .await
        .map_err(|e| e.to_string())
}
