//! WebSocket connection handlers.

use std::{panic::AssertUnwindSafe, sync::Arc};

use axum::{
    body::Bytes,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    FutureExt,
    sink::SinkExt,
    stream::{Stream, StreamExt},
};
use tokio::sync::{mpsc, oneshot};

use crate::{
    domain::{ConnectionId, ConnectionIdFactory, Notification},
    infrastructure::dto::websocket::{ClientEvent, ServerEvent},
    ui::{error::EventError, state::AppState},
    usecase::{
        ConnectSessionUseCase, DisconnectSessionUseCase, JoinRoomUseCase, RelayCodeChangeUseCase,
        SyncCodeUseCase,
    },
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionIdFactory::generate();

    // Create a channel for this connection to receive notifications
    let (tx, mut rx) = mpsc::unbounded_channel::<Notification>();

    {
        let _gate = state.dispatch_gate.lock().await;
        let connect_usecase = ConnectSessionUseCase::new(state.repository.clone());
        if let Err(e) = connect_usecase.execute(connection_id.clone(), tx).await {
            tracing::warn!("Rejecting connection '{}': {}", connection_id, e);
            return;
        }
    }
    tracing::info!("Socket connected: {}", connection_id);

    let (mut sender, receiver) = socket.split();
    let heartbeat = state.heartbeat;

    // Receive frames from this connection and dispatch them
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut recv_task = tokio::spawn(receive_loop(
        receiver,
        state.clone(),
        connection_id.clone(),
        stop_rx,
    ));

    // Forward notifications and heartbeat pings to this connection
    let mut send_task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(heartbeat.interval);
        ticker.tick().await; // the first tick completes immediately
        loop {
            tokio::select! {
                notification = rx.recv() => {
                    let Some(notification) = notification else { break };
                    let json = match serde_json::to_string(&ServerEvent::from(notification)) {
                        Ok(json) => json,
                        Err(e) => {
                            tracing::error!("Failed to encode server event: {}", e);
                            continue;
                        }
                    };
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    if sender.send(Message::Ping(Bytes::new())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    // The send side can be aborted at any point. The receive side may be in
    // the middle of an event, so it is asked to stop between frames instead.
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => {
            let _ = stop_tx.send(());
            if let Err(e) = recv_task.await {
                tracing::error!("Receive task for '{}' failed: {}", connection_id, e);
            }
        }
    };

    // Notify peers and drop the registry entry before this handler returns
    let _gate = state.dispatch_gate.lock().await;
    let disconnect_usecase = DisconnectSessionUseCase::new(state.repository.clone());
    match disconnect_usecase.execute(&connection_id).await {
        Ok(notified) => {
            let remaining = disconnect_usecase.count_remaining_connections().await;
            tracing::info!(
                "Socket disconnected: {} (notified {} peer(s), {} connection(s) remaining)",
                connection_id,
                notified.len(),
                remaining
            );
        }
        Err(e) => tracing::warn!("Failed to clean up '{}': {}", connection_id, e),
    }
}

/// Read frames until the peer goes away, falls silent or `stop` fires.
///
/// `stop` is only observed while waiting for the next frame, so an event that
/// is already being dispatched always runs to completion.
async fn receive_loop<S>(
    mut receiver: S,
    state: Arc<AppState>,
    connection_id: ConnectionId,
    mut stop: oneshot::Receiver<()>,
) where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    let heartbeat = state.heartbeat;
    loop {
        let next = tokio::select! {
            _ = &mut stop => break,
            next = tokio::time::timeout(heartbeat.timeout, receiver.next()) => next,
        };

        let msg = match next {
            Ok(Some(Ok(msg))) => msg,
            Ok(Some(Err(e))) => {
                tracing::error!("WebSocket error on '{}': {}", connection_id, e);
                break;
            }
            Ok(None) => break,
            Err(_) => {
                tracing::warn!(
                    "No frame from '{}' within {:?}, closing",
                    connection_id,
                    heartbeat.timeout
                );
                break;
            }
        };

        match msg {
            Message::Text(text) => {
                tracing::debug!(
                    "Received text from '{}' ({} bytes)",
                    connection_id,
                    text.as_str().len()
                );
                dispatch_text(&state, &connection_id, text.as_str()).await;
            }
            Message::Binary(_) => {
                reply_error(&state, &connection_id, EventError::UnsupportedFrame).await;
            }
            Message::Ping(_) | Message::Pong(_) => {
                // Any frame counts as liveness; axum answers pings itself
                tracing::trace!("Heartbeat frame from '{}'", connection_id);
            }
            Message::Close(_) => {
                tracing::info!("Connection '{}' requested close", connection_id);
                break;
            }
        }
    }
}

/// Decode one text frame and run it through the dispatch gate.
///
/// Any failure, including a panic inside a use case, is reported to the
/// sender as an `error` event; the connection stays open.
async fn dispatch_text(state: &AppState, connection_id: &ConnectionId, text: &str) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Failed to parse event from '{}': {}", connection_id, e);
            reply_error(state, connection_id, EventError::from(e)).await;
            return;
        }
    };

    let _gate = state.dispatch_gate.lock().await;
    let outcome = AssertUnwindSafe(handle_event(state, connection_id, event))
        .catch_unwind()
        .await;

    let error = match outcome {
        Ok(Ok(())) => return,
        Ok(Err(e)) => e,
        Err(_) => {
            tracing::error!(
                "Handler panicked while processing event from '{}'",
                connection_id
            );
            EventError::Panicked
        }
    };
    tracing::warn!("Rejected event from '{}': {}", connection_id, error);
    reply_error(state, connection_id, error).await;
}

async fn handle_event(
    state: &AppState,
    connection_id: &ConnectionId,
    event: ClientEvent,
) -> Result<(), EventError> {
    let repository = state.repository.clone();
    match event {
        ClientEvent::Join { room_id, username } => {
            JoinRoomUseCase::new(repository)
                .execute(connection_id, room_id, username)
                .await?;
        }
        ClientEvent::CodeChange { room_id, code } => {
            RelayCodeChangeUseCase::new(repository)
                .execute(connection_id, room_id, code)
                .await?;
        }
        ClientEvent::SyncCode {
            connection_id: target,
            code,
        } => {
            SyncCodeUseCase::new(repository).execute(target, code).await?;
        }
    }
    Ok(())
}

async fn reply_error(state: &AppState, connection_id: &ConnectionId, error: EventError) {
    let notification = Notification::Error {
        message: error.to_string(),
    };
    if let Err(e) = state.repository.deliver(connection_id, notification).await {
        tracing::warn!("Failed to send error event to '{}': {}", connection_id, e);
    }
}
