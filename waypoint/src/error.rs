//! Error types for the waypoint routing runtime.

use crate::address::Address;
use thiserror::Error;

/// Errors related to worker registration on a [`Node`](crate::Node).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// A worker is already registered under this address.
    #[error("duplicate address: {0}")]
    DuplicateAddress(Address),

    /// No worker is registered under this address.
    #[error("no worker registered at: {0}")]
    NotRegistered(Address),
}

/// Errors produced while routing a message through a node.
///
/// Routing errors are returned to whoever initiated the routing call,
/// either the transport adapter or a worker re-routing from inside its
/// handler. They are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// The front of the onward route names an address with no worker.
    #[error("unknown address: {0}")]
    UnknownAddress(Address),

    /// A route step was attempted on an empty route.
    #[error("route is empty")]
    EmptyRoute,

    /// A worker tried to step a route whose front is not its own address.
    #[error("malformed route: expected {expected} at the front, found {found:?}")]
    MalformedRoute {
        /// The address of the worker stepping the route.
        expected: Address,
        /// What was actually at the front of the onward route.
        found: Option<Address>,
    },

    /// The routing chain exceeded the node's hop limit (loop protection).
    #[error("too many hops (max: {max})")]
    HopLimitExceeded {
        /// The configured hop limit.
        max: usize,
    },

    /// A worker panicked while handling a message.
    #[error("worker panicked: {0}")]
    WorkerPanicked(Address),

    /// A user-defined worker rejected a message.
    #[error("worker {address} failed: {reason}")]
    WorkerFailed {
        /// The address of the failing worker.
        address: Address,
        /// Human readable failure reason.
        reason: String,
    },

    /// A nested route reached a worker whose handler is still running
    /// further up the same call.
    #[error("re-entrant route to busy worker: {0}")]
    Reentrant(Address),
}

/// Errors from the WebSocket transport adapter.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Binding the listener failed.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// The address we tried to bind.
        addr: std::net::SocketAddr,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The HTTP server stopped with an I/O error.
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),

    /// An inbound frame could not be decoded.
    #[error("invalid frame: {0}")]
    Decode(#[from] serde_json::Error),

    /// Routing an inbound message failed.
    #[error("routing failed: {0}")]
    Routing(#[from] RoutingError),

    /// Registering a transport worker failed.
    #[error("registration failed: {0}")]
    Registration(#[from] RegistrationError),
}
