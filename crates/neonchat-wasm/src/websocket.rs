use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::future::{self, Either};
use futures::{SinkExt, StreamExt};
use gloo_net::websocket::{futures::WebSocket, Message as WsMessage, State, WebSocketError};

use neonchat_core::{ConnectionEvent, ConnectionId, NORMAL_CLOSURE};

/// Commands the widget sends to a running connection task
enum LinkCommand {
    Transmit(String),
    Close(u16),
}

/// Widget-side handle to one connection task
///
/// Dropping the handle closes the socket with a normal-closure code.
pub struct Link {
    connection: ConnectionId,
    commands: UnboundedSender<LinkCommand>,
}

impl Link {
    pub fn transmit(&self, payload: String) {
        if self.commands.unbounded_send(LinkCommand::Transmit(payload)).is_err() {
            log::debug!("{} already finished, dropping payload", self.connection);
        }
    }

    pub fn close(&self, code: u16) {
        if self.commands.unbounded_send(LinkCommand::Close(code)).is_err() {
            log::debug!("{} already finished, nothing to close", self.connection);
        }
    }
}

/// Open a WebSocket on a local task and forward its events to `on_event`.
pub fn spawn_link<F>(connection: ConnectionId, url: String, on_event: F) -> Link
where
    F: Fn(ConnectionEvent) + 'static,
{
    let (commands, receiver) = mpsc::unbounded();
    wasm_bindgen_futures::spawn_local(run_link(connection, url, receiver, on_event));
    Link { connection, commands }
}

enum Handshake {
    Ready(Result<(), WebSocketError>),
    Abandoned(u16),
}

enum Step {
    Command(Option<LinkCommand>),
    Inbound(Option<Result<WsMessage, WebSocketError>>),
}

async fn run_link<F>(connection: ConnectionId, url: String, mut commands: UnboundedReceiver<LinkCommand>, on_event: F)
where
    F: Fn(ConnectionEvent),
{
    log::info!("Connecting {} to WebSocket: {}", connection, url);
    let mut ws = match WebSocket::open(&url) {
        Ok(ws) => ws,
        Err(e) => {
            on_event(ConnectionEvent::failed(connection, format!("Failed to connect: {:?}", e)));
            return;
        }
    };

    // The sink stays pending until the handshake completes or the socket dies
    let handshake = {
        let ready = future::poll_fn(|cx| ws.poll_ready_unpin(cx));
        match future::select(ready, commands.next()).await {
            Either::Left((result, _)) => Handshake::Ready(result),
            Either::Right((Some(LinkCommand::Close(code)), _)) => Handshake::Abandoned(code),
            Either::Right((_, _)) => Handshake::Abandoned(NORMAL_CLOSURE),
        }
    };

    match handshake {
        Handshake::Ready(Ok(())) if matches!(ws.state(), State::Open) => {
            on_event(ConnectionEvent::opened(connection));
        }
        Handshake::Ready(Ok(())) => {
            on_event(ConnectionEvent::failed(connection, "connection closed during handshake"));
            return;
        }
        Handshake::Ready(Err(e)) => {
            on_event(ConnectionEvent::failed(connection, format!("WebSocket error: {:?}", e)));
            return;
        }
        Handshake::Abandoned(code) => {
            log::debug!("{} abandoned before open", connection);
            close_socket(ws, code);
            return;
        }
    }

    let (mut sink, mut stream) = ws.split();

    loop {
        let step = match future::select(commands.next(), stream.next()).await {
            Either::Left((command, _)) => Step::Command(command),
            Either::Right((message, _)) => Step::Inbound(message),
        };

        match step {
            Step::Command(Some(LinkCommand::Transmit(payload))) => {
                log::debug!("Sending on {}: {}", connection, payload);
                if let Err(e) = sink.send(WsMessage::Text(payload)).await {
                    on_event(ConnectionEvent::failed(connection, format!("Failed to send: {:?}", e)));
                    return;
                }
            }
            Step::Command(Some(LinkCommand::Close(code))) => {
                log::debug!("Closing {} with code {}", connection, code);
                if let Ok(ws) = sink.reunite(stream) {
                    close_socket(ws, code);
                }
                return;
            }
            Step::Command(None) => {
                if let Ok(ws) = sink.reunite(stream) {
                    close_socket(ws, NORMAL_CLOSURE);
                }
                return;
            }
            Step::Inbound(Some(Ok(WsMessage::Text(text)))) => {
                on_event(ConnectionEvent::fragment(connection, text));
            }
            Step::Inbound(Some(Ok(WsMessage::Bytes(_)))) => {
                log::warn!("Received unexpected binary message on {}", connection);
            }
            Step::Inbound(Some(Err(WebSocketError::ConnectionClose(event)))) => {
                log::info!("WebSocket {} closed (code {})", connection, event.code);
                on_event(ConnectionEvent::closed(connection, event.code, event.was_clean));
                return;
            }
            Step::Inbound(Some(Err(e))) => {
                on_event(ConnectionEvent::failed(connection, format!("WebSocket error: {:?}", e)));
                return;
            }
            Step::Inbound(None) => {
                log::info!("WebSocket {} closed", connection);
                on_event(ConnectionEvent::closed(connection, NORMAL_CLOSURE, true));
                return;
            }
        }
    }
}

fn close_socket(ws: WebSocket, code: u16) {
    if let Err(e) = ws.close(Some(code), None) {
        log::warn!("Failed to close WebSocket: {:?}", e);
    }
}
