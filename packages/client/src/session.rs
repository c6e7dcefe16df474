//! One WebSocket session with the relay, plus the reconnection loop.

use futures_util::{
    SinkExt, StreamExt,
    stream::SplitSink,
};
use tokio::{net::TcpStream, sync::mpsc::UnboundedReceiver};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message,
};

use coderoom_server::infrastructure::dto::websocket::{ClientEvent, ServerEvent};

use crate::{
    config::ClientConfig,
    domain::{Command, EditorState},
    error::ClientError,
    formatter::{format_document, format_members, format_notice},
};

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;

/// How a session ended
#[derive(Debug, PartialEq, Eq)]
pub enum SessionEnd {
    Quit,
    ConnectionLost,
}

/// Single connection attempt bounded by the configured timeout
pub async fn connect_once(config: &ClientConfig) -> Result<WsStream, ClientError> {
    match tokio::time::timeout(config.connect_timeout, connect_async(config.url.as_str())).await {
        Ok(Ok((ws, _response))) => Ok(ws),
        Ok(Err(e)) => Err(e.into()),
        Err(_) => Err(ClientError::Timeout(config.connect_timeout)),
    }
}

/// Keep trying until a connection succeeds. There is no attempt limit.
pub async fn connect_with_retry(config: &ClientConfig) -> WsStream {
    let mut attempt: u64 = 0;
    loop {
        attempt += 1;
        match connect_once(config).await {
            Ok(ws) => {
                tracing::info!("Connected to {} (attempt {})", config.url, attempt);
                return ws;
            }
            Err(e) => {
                tracing::warn!("Connection attempt {} failed: {}", attempt, e);
                println!("! Connection failed. Trying to reconnect... ({e})");
                tokio::time::sleep(config.retry_delay).await;
            }
        }
    }
}

/// Join the room and pump events both ways until the user quits or the
/// connection drops.
pub async fn run_session(
    ws: WsStream,
    state: &mut EditorState,
    input: &mut UnboundedReceiver<Command>,
) -> SessionEnd {
    let (mut sink, mut stream) = ws.split();

    if let Err(e) = send_event(&mut sink, &state.join_event()).await {
        tracing::warn!("Failed to send join: {}", e);
        return SessionEnd::ConnectionLost;
    }

    loop {
        tokio::select! {
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    let event = match serde_json::from_str::<ServerEvent>(text.as_str()) {
                        Ok(event) => event,
                        Err(e) => {
                            tracing::warn!("{}", ClientError::from(e));
                            continue;
                        }
                    };
                    let applied = state.apply(event);
                    if let Some(notice) = &applied.notice {
                        println!("{}", format_notice(notice));
                    }
                    if let Some(reply) = &applied.reply
                        && let Err(e) = send_event(&mut sink, reply).await
                    {
                        tracing::warn!("Failed to reply: {}", e);
                        return SessionEnd::ConnectionLost;
                    }
                }
                Some(Ok(Message::Close(_))) | None => return SessionEnd::ConnectionLost,
                Some(Ok(_)) => {} // ping/pong are answered by tungstenite
                Some(Err(e)) => {
                    tracing::warn!("WebSocket error: {}", e);
                    return SessionEnd::ConnectionLost;
                }
            },
            command = input.recv() => {
                let outgoing = match command {
                    None | Some(Command::Quit) => {
                        let _ = sink.close().await;
                        return SessionEnd::Quit;
                    }
                    Some(command) => apply_local(state, command),
                };
                if let Some(event) = outgoing
                    && let Err(e) = send_event(&mut sink, &event).await
                {
                    tracing::warn!("Failed to send edit: {}", e);
                    return SessionEnd::ConnectionLost;
                }
            }
        }
    }
}

/// Apply a command to local state, returning the event to broadcast if any.
/// Quit is handled by the caller.
pub fn apply_local(state: &mut EditorState, command: Command) -> Option<ClientEvent> {
    match command {
        Command::Append(line) => Some(state.append_line(&line)),
        Command::Clear => Some(state.clear()),
        Command::Show => {
            println!("{}", format_document(state.document()));
            None
        }
        Command::Members => {
            println!("{}", format_members(state.members()));
            None
        }
        Command::Quit => None,
    }
}

async fn send_event(sink: &mut WsSink, event: &ClientEvent) -> Result<(), ClientError> {
    let json = serde_json::to_string(event)?;
    sink.send(Message::text(json)).await?;
    Ok(())
}
