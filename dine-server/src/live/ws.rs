//! WebSocket handlers for real-time order updates
//!
//! Two endpoints share the [`LiveHub`](super::LiveHub):
//!
//! - `GET /api/live/ws` — customer socket. The client sends
//!   `{"type":"subscribe","orderId":"..."}` after placing or viewing an
//!   order to join that order's room; there is no unsubscribe — room
//!   membership dies with the connection.
//! - `GET /api/live/admin/ws` — staff socket (admin JWT). Receives the
//!   full staff broadcast stream regardless of rooms.
//!
//! Delivery is fire-and-forget; a lagging or disconnected client misses
//! events and reconciles by re-fetching order state over HTTP.

use axum::Extension;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use shared::message::{ClientMessage, OrderEvent, order_room};
use std::collections::HashSet;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

use crate::auth::CurrentUser;
use crate::core::ServerState;

/// GET /api/live/ws — upgrade to the customer socket
pub async fn customer_ws(
    State(state): State<ServerState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| customer_connection(socket, state))
}

async fn customer_connection(socket: WebSocket, state: ServerState) {
    let (mut ws_sink, mut ws_stream) = socket.split();

    // Forwarder tasks funnel room events into one channel for this socket
    let (event_tx, mut event_rx) = mpsc::channel::<OrderEvent>(32);
    let shutdown = CancellationToken::new();
    let mut joined: HashSet<String> = HashSet::new();

    tracing::debug!("Customer socket connected");

    loop {
        tokio::select! {
            // Incoming message from the client
            msg = ws_stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(ClientMessage::Subscribe { order_id }) => {
                                let room = order_room(&order_id);
                                if joined.insert(room.clone()) {
                                    spawn_room_forwarder(
                                        state.live.subscribe_room(&room),
                                        event_tx.clone(),
                                        shutdown.clone(),
                                    );
                                    tracing::debug!(room = %room, "Customer joined order room");
                                }
                            }
                            Err(e) => {
                                tracing::debug!("Ignoring invalid client message: {e}");
                            }
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = ws_sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!("Customer socket error: {e}");
                        break;
                    }
                    _ => {} // Binary, Pong — ignore
                }
            }

            // Room event to push to the client
            event = event_rx.recv() => {
                match event {
                    Some(event) => {
                        if !send_event(&mut ws_sink, &event).await {
                            break;
                        }
                    }
                    None => break, // all forwarders gone
                }
            }
        }
    }

    // Cleanup: stop forwarders, dropping their room receivers
    shutdown.cancel();
    let _ = ws_sink.close().await;
    tracing::debug!(rooms = joined.len(), "Customer socket cleaned up");
}

/// Forward one room's broadcast stream into the connection channel
fn spawn_room_forwarder(
    mut room_rx: broadcast::Receiver<OrderEvent>,
    event_tx: mpsc::Sender<OrderEvent>,
    shutdown: CancellationToken,
) {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                event = room_rx.recv() => {
                    match event {
                        Ok(event) => {
                            if event_tx.send(event).await.is_err() {
                                break;
                            }
                        }
                        // Missed events are reconciled over HTTP, keep going
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::debug!(skipped, "Room subscriber lagged");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
            }
        }
    });
}

/// GET /api/live/admin/ws — upgrade to the staff broadcast socket
pub async fn admin_ws(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| admin_connection(socket, state, user))
}

async fn admin_connection(socket: WebSocket, state: ServerState, user: CurrentUser) {
    let (mut ws_sink, mut ws_stream) = socket.split();
    let mut staff_rx = state.live.subscribe_staff();

    tracing::info!(admin = %user.name, "Staff socket connected");

    loop {
        tokio::select! {
            event = staff_rx.recv() => {
                match event {
                    Ok(event) => {
                        if !send_event(&mut ws_sink, &event).await {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(admin = %user.name, skipped, "Staff subscriber lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            msg = ws_stream.next() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        let _ = ws_sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(admin = %user.name, "Staff socket error: {e}");
                        break;
                    }
                    _ => {} // staff sockets are receive-only
                }
            }
        }
    }

    let _ = ws_sink.close().await;
    tracing::info!(admin = %user.name, "Staff socket disconnected");
}

/// Serialize an event frame and push it; returns false when the socket is gone
async fn send_event<S>(ws_sink: &mut S, event: &OrderEvent) -> bool
where
    S: futures::Sink<Message, Error = axum::Error> + Unpin,
{
    match event.to_frame().to_text() {
        Ok(json) => ws_sink.send(Message::Text(json.into())).await.is_ok(),
        Err(e) => {
            tracing::error!("Failed to serialize event frame: {e}");
            true
        }
    }
}
