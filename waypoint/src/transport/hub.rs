//! Set of open peer connections.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use bytes::Bytes;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::Address;

/// Address prefix given to every connected peer.
pub const PEER_PREFIX: &str = "peer/";

/// Registry of open connections and their outbound queues.
///
/// Each peer gets an unbounded queue; the connection task drains it into
/// the socket. Dropping a peer's sender (via [`Hub::leave`]) ends that
/// drain loop.
#[derive(Debug, Default)]
pub struct Hub {
    peers: RwLock<HashMap<Address, UnboundedSender<Bytes>>>,
    next_id: AtomicU64,
}

impl Hub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new peer. Returns its address and the queue of payloads to
    /// write to its socket.
    pub fn join(&self) -> (Address, UnboundedReceiver<Bytes>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let address = Address::new(format!("{PEER_PREFIX}{id}"));
        let (tx, rx) = mpsc::unbounded_channel();
        self.peers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(address.clone(), tx);
        tracing::debug!(peer = %address, "peer joined");
        (address, rx)
    }

    /// Remove a peer. Returns false if it was not connected.
    pub fn leave(&self, peer: &Address) -> bool {
        let removed = self
            .peers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(peer)
            .is_some();
        if removed {
            tracing::debug!(peer = %peer, "peer left");
        }
        removed
    }

    /// Queue `payload` for one peer. Returns false if the peer is gone.
    pub fn send_to(&self, peer: &Address, payload: Bytes) -> bool {
        let peers = self.peers.read().unwrap_or_else(PoisonError::into_inner);
        match peers.get(peer) {
            Some(tx) => tx.send(payload).is_ok(),
            None => false,
        }
    }

    /// Queue `payload` for every peer except `except`. Returns how many
    /// peers it was queued for.
    pub fn broadcast(&self, except: Option<&Address>, payload: Bytes) -> usize {
        let peers = self.peers.read().unwrap_or_else(PoisonError::into_inner);
        peers
            .iter()
            .filter(|(address, _)| Some(*address) != except)
            .filter(|(_, tx)| tx.send(payload.clone()).is_ok())
            .count()
    }

    /// Addresses of all connected peers, sorted.
    pub fn peers(&self) -> Vec<Address> {
        let mut peers: Vec<Address> = self
            .peers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        peers.sort();
        peers
    }

    /// Number of connected peers.
    pub fn len(&self) -> usize {
        self.peers.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// True when no peer is connected.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
