//! WebSocket connection handler feeding text frames to the router.
//!
//! Each connection performs the WebSocket handshake, then loops: read one
//! data frame, route it, send exactly one text frame back. Control frames are
//! answered by `tungstenite` itself. A close frame or a transport error ends
//! the loop for that connection only.

use std::sync::Arc;

use tracing::{debug, info, warn};
use tungstenite::{Message, WebSocket};

use crate::transport::{ConnectionHandler, ConnectionStream};

use super::response::{Response, SERIALISATION_FALLBACK};
use super::router::{DISPATCH_TARGET, MessageRouter};

/// Connection handler that serves the gateway protocol over WebSocket.
#[derive(Debug, Clone)]
pub(crate) struct GatewayConnectionHandler {
    router: Arc<MessageRouter>,
}

impl GatewayConnectionHandler {
    /// Creates a handler sharing `router` with every other connection.
    pub(crate) fn new(router: Arc<MessageRouter>) -> Self {
        Self { router }
    }

    fn serve(&self, socket: &mut WebSocket<ConnectionStream>) {
        loop {
            let message = match socket.read() {
                Ok(message) => message,
                Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                    return;
                }
                Err(error) => {
                    warn!(target: DISPATCH_TARGET, %error, "websocket read failed");
                    return;
                }
            };

            let response = match message {
                Message::Text(text) => self.router.handle_text(text.as_str()),
                Message::Binary(bytes) => self.router.handle_text(&String::from_utf8_lossy(&bytes)),
                Message::Close(frame) => {
                    debug!(target: DISPATCH_TARGET, ?frame, "client sent close frame");
                    continue;
                }
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
            };

            if let Err(error) = socket.send(Message::text(encode(&response))) {
                warn!(target: DISPATCH_TARGET, %error, "websocket send failed");
                return;
            }
        }
    }
}

impl ConnectionHandler for GatewayConnectionHandler {
    fn handle(&self, stream: ConnectionStream) {
        let peer = stream.peer();
        let mut socket = match tungstenite::accept(stream) {
            Ok(socket) => socket,
            Err(error) => {
                warn!(target: DISPATCH_TARGET, %peer, %error, "websocket handshake failed");
                return;
            }
        };
        info!(target: DISPATCH_TARGET, %peer, "client connected");
        self.serve(&mut socket);
        info!(target: DISPATCH_TARGET, %peer, "client disconnected");
    }
}

fn encode(response: &Response) -> String {
    response.to_json().unwrap_or_else(|error| {
        warn!(target: DISPATCH_TARGET, %error, "failed to serialise response");
        SERIALISATION_FALLBACK.to_owned()
    })
}
