//! HTTP/WebSocket listener feeding the routing core.

use std::sync::Arc;

use axum::extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;

use super::frame;
use super::{Broadcaster, Hub, PeerWorker};
use crate::config::ServerConfig;
use crate::error::TransportError;
use crate::{Address, Node, Route};

/// Plain-text body served on `GET /` without a WebSocket upgrade.
pub const STATUS_TEXT: &str = "Hello Waypoint";

/// First frame sent to every new connection.
pub const WELCOME_TEXT: &str = "Welcome New Client!";

#[derive(Clone)]
struct AppState {
    node: Node,
    hub: Arc<Hub>,
    default_route: Route,
}

/// WebSocket front end for a [`Node`].
///
/// # Usage
///
/// ```rust,ignore
/// let node = Node::with_config(config.node_config());
/// Server::new(node, config)?.run().await?;
/// ```
pub struct Server {
    node: Node,
    hub: Arc<Hub>,
    config: ServerConfig,
}

impl Server {
    /// Create a server for `node` and register its broadcast worker.
    pub fn new(node: Node, config: ServerConfig) -> Result<Self, TransportError> {
        let hub = Arc::new(Hub::new());
        node.start_worker(
            config.broadcast_address.clone(),
            Broadcaster::new(hub.clone()),
        )?;
        Ok(Self { node, hub, config })
    }

    /// The node inbound frames are routed into.
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// The set of open connections.
    pub fn hub(&self) -> &Arc<Hub> {
        &self.hub
    }

    /// The axum router serving `/`.
    pub fn router(&self) -> Router {
        let state = AppState {
            node: self.node.clone(),
            hub: self.hub.clone(),
            default_route: self.config.default_route(),
        };
        Router::new().route("/", get(root)).with_state(state)
    }

    /// Bind the configured address and serve until the listener fails.
    pub async fn run(self) -> Result<(), TransportError> {
        let addr = self.config.listen;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| TransportError::Bind { addr, source })?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener.
    pub async fn serve(self, listener: TcpListener) -> Result<(), TransportError> {
        match listener.local_addr() {
            Ok(addr) => tracing::info!(%addr, "listening"),
            Err(err) => tracing::warn!(error = %err, "listening on unknown address"),
        }
        axum::serve(listener, self.router())
            .await
            .map_err(TransportError::Serve)
    }
}

async fn root(State(state): State<AppState>, ws: Option<WebSocketUpgrade>) -> Response {
    match ws {
        Some(ws) => ws.on_upgrade(move |socket| handle_socket(socket, state)),
        None => STATUS_TEXT.into_response(),
    }
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (peer, mut outbound) = state.hub.join();
    if let Err(err) = state
        .node
        .start_worker(peer.clone(), PeerWorker::new(state.hub.clone()))
    {
        tracing::error!(peer = %peer, error = %err, "failed to register peer worker");
        state.hub.leave(&peer);
        return;
    }

    tracing::info!(peer = %peer, "client connected");
    state.hub.send_to(&peer, Bytes::from_static(WELCOME_TEXT.as_bytes()));

    let (mut sink, mut stream) = socket.split();
    let writer = tokio::spawn(async move {
        while let Some(payload) = outbound.recv().await {
            if sink.send(to_ws_message(payload)).await.is_err() {
                break;
            }
        }
        let _ = sink.close().await;
    });

    while let Some(incoming) = stream.next().await {
        let decoded = match incoming {
            Ok(WsMessage::Text(text)) => {
                tracing::debug!(peer = %peer, "received: {text}");
                frame::decode_text(&text, &peer, &state.default_route)
            }
            Ok(WsMessage::Binary(data)) => Ok(frame::decode_binary(
                Bytes::from(data),
                &peer,
                &state.default_route,
            )),
            Ok(WsMessage::Close(_)) => {
                tracing::debug!(peer = %peer, "client sent close");
                break;
            }
            Ok(_) => continue,
            Err(err) => {
                tracing::warn!(peer = %peer, error = %err, "websocket error");
                break;
            }
        };

        if let Err(err) = deliver(&state, decoded).await {
            tracing::warn!(peer = %peer, error = %err, "inbound frame not delivered");
            state
                .hub
                .send_to(&peer, Bytes::from(format!("error: {err}")));
        }
    }

    disconnect(&state, &peer);
    let _ = writer.await;
    tracing::info!(peer = %peer, "client disconnected");
}

async fn deliver(
    state: &AppState,
    decoded: Result<crate::Message, TransportError>,
) -> Result<(), TransportError> {
    state.node.route(decoded?).await?;
    Ok(())
}

fn disconnect(state: &AppState, peer: &Address) {
    // Dropping the hub's sender ends the writer loop.
    state.hub.leave(peer);
    if let Err(err) = state.node.stop_worker(peer) {
        tracing::debug!(peer = %peer, error = %err, "peer worker already gone");
    }
}

fn to_ws_message(payload: Bytes) -> WsMessage {
    match String::from_utf8(payload.to_vec()) {
        Ok(text) => WsMessage::Text(text),
        Err(err) => WsMessage::Binary(err.into_bytes()),
    }
}
