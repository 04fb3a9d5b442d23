//! WebSocket transport adapter.
//!
//! Bridges network connections into the routing core. Every connection
//! becomes a peer with its own address (`peer/<n>`) and a
//! [`PeerWorker`] registered under it, so replies travel back to the
//! socket through ordinary return routes.
//!
//! ```text
//!  ws frame ──decode──▶ Message ──▶ Node::route
//!                                      │
//!            ◀── PeerWorker ◀──────────┤ (onward route ends at peer/<n>)
//!  all peers ◀── Broadcaster ◀─────────┘ (onward route ends at "broadcast")
//! ```

pub mod frame;
mod hub;
mod server;
mod workers;

pub use frame::Frame;
pub use hub::{Hub, PEER_PREFIX};
pub use server::{Server, STATUS_TEXT, WELCOME_TEXT};
pub use workers::{Broadcaster, PeerWorker};
