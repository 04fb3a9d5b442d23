//! Per-invocation worker context.

use crate::address::Address;
use crate::error::RoutingError;
use crate::message::Message;
use crate::node::Node;
use crate::route::Route;
use bytes::Bytes;

/// Handle given to a worker for the duration of one `handle_message` call.
///
/// Carries the address the worker is running as and a handle to the
/// owning [`Node`]. Messages passed to [`Context::route`] are collected
/// here and dispatched by the node once the handler returns, which keeps
/// arbitrarily long hop chains off the call stack.
///
/// A context is created fresh for every dispatch step and cannot outlive it.
pub struct Context {
    address: Address,
    node: Node,
    outbox: Vec<Message>,
}

impl Context {
    pub(crate) fn new(address: Address, node: Node) -> Self {
        Self {
            address,
            node,
            outbox: Vec::new(),
        }
    }

    /// The address of the worker currently executing.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// The node this worker is registered on.
    ///
    /// Awaiting [`Node::route`] from inside a handler runs a nested chain
    /// to completion before the handler continues. That chain must not
    /// pass through this worker, or any other worker whose handler is
    /// still waiting on it: such a delivery fails with
    /// [`RoutingError::Reentrant`]. Use [`Context::route`] to continue
    /// through them instead.
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Continue routing a message.
    ///
    /// The next hop is checked immediately: an unregistered front address
    /// fails with [`RoutingError::UnknownAddress`] so the worker sees the
    /// error. An empty onward route is accepted and ends that message's
    /// journey. May be called any number of times per invocation.
    pub fn route(&mut self, message: Message) -> Result<(), RoutingError> {
        let Some(next) = message.onward_route.next() else {
            tracing::trace!(address = %self.address, "onward route exhausted, message absorbed");
            return Ok(());
        };

        if !self.node.has_worker(next) {
            return Err(RoutingError::UnknownAddress(next.clone()));
        }

        tracing::trace!(
            address = %self.address,
            next = %next,
            "message queued for next hop"
        );
        self.outbox.push(message);
        Ok(())
    }

    /// Send a new message originating from this worker.
    ///
    /// The return route is set to this worker's address so replies find
    /// their way back.
    pub fn send(
        &mut self,
        route: impl Into<Route>,
        payload: impl Into<Bytes>,
    ) -> Result<(), RoutingError> {
        let message = Message::new(route, Route::single(self.address.clone()), payload);
        self.route(message)
    }

    pub(crate) fn into_outbox(self) -> Vec<Message> {
        self.outbox
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("address", &self.address)
            .field("pending", &self.outbox.len())
            .finish()
    }
}
