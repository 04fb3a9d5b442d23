//! Workers that write routed payloads back to connections.

use std::sync::Arc;

use async_trait::async_trait;

use super::Hub;
use crate::{Context, Message, RoutingError, Worker};

/// Terminal worker bound to one connection's peer address.
///
/// Writes the payload of every message it receives to that connection.
#[derive(Debug, Clone)]
pub struct PeerWorker {
    hub: Arc<Hub>,
}

impl PeerWorker {
    /// Create a peer worker writing through `hub`.
    pub fn new(hub: Arc<Hub>) -> Self {
        Self { hub }
    }
}

#[async_trait]
impl Worker for PeerWorker {
    async fn handle_message(&mut self, ctx: &mut Context, msg: Message) -> Result<(), RoutingError> {
        if self.hub.send_to(ctx.address(), msg.payload) {
            Ok(())
        } else {
            Err(RoutingError::WorkerFailed {
                address: ctx.address().clone(),
                reason: "connection closed".to_string(),
            })
        }
    }
}

/// Terminal worker that fans a payload out to every open connection
/// except the one it originated from.
///
/// The origin is the last entry of the return route. Inbound frames
/// always end their return route with the sending peer.
#[derive(Debug, Clone)]
pub struct Broadcaster {
    hub: Arc<Hub>,
}

impl Broadcaster {
    /// Create a broadcaster writing through `hub`.
    pub fn new(hub: Arc<Hub>) -> Self {
        Self { hub }
    }
}

#[async_trait]
impl Worker for Broadcaster {
    async fn handle_message(&mut self, ctx: &mut Context, msg: Message) -> Result<(), RoutingError> {
        let origin = msg.return_route.last();
        let delivered = self.hub.broadcast(origin, msg.payload.clone());
        tracing::debug!(
            address = %ctx.address(),
            origin = ?origin,
            delivered,
            "broadcast"
        );
        Ok(())
    }
}
