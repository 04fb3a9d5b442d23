//! Shared helpers for routing tests.

use tokio::sync::mpsc::{self, UnboundedReceiver};
use waypoint::workers::{Inbox, Printer};
use waypoint::{Message, Node};

/// Register a sink-backed printer at `address`; messages arrive exactly
/// as the printer received them.
pub fn observe(node: &Node, address: &str) -> UnboundedReceiver<Message> {
    let (tx, rx) = mpsc::unbounded_channel();
    node.start_worker(address, Printer::with_sink(tx))
        .expect("register observer");
    rx
}

/// Register an inbox at `address`; messages arrive with that hop consumed.
pub fn inbox(node: &Node, address: &str) -> UnboundedReceiver<Message> {
    let (inbox, rx) = Inbox::channel();
    node.start_worker(address, inbox).expect("register inbox");
    rx
}
