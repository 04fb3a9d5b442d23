//! # Waypoint
//!
//! A minimal actor-style message routing runtime.
//!
//! Workers are registered on a [`Node`] under an [`Address`]. A
//! [`Message`] carries an onward route, a return route and an opaque
//! payload; the node delivers it to the worker named at the front of the
//! onward route, and that worker decides how to rewrite the routes before
//! handing it back for the next hop.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  transport (axum WebSocket adapter)                      │
//! │  • Hub: open connections                                 │
//! │  • frame decoding → Message                              │
//! │  • PeerWorker / Broadcaster: Message → connections       │
//! ├──────────────────────────────────────────────────────────┤
//! │  routing core                                            │
//! │  • Node: registry + trampoline dispatch                  │
//! │  • Context: per-invocation handle, route()/send()        │
//! │  • Worker trait + Hop, Echoer, Printer, Inbox            │
//! │  • Message, Route, Address                               │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use waypoint::{Message, Node};
//! use waypoint::workers::{Echoer, Hop, Printer};
//!
//! let node = Node::new();
//! node.start_worker("h1", Hop)?;
//! node.start_worker("echoer", Echoer)?;
//! node.start_worker("app", Printer::new())?;
//!
//! // h1 → echoer → h1 → app
//! node.route(Message::new(["h1", "echoer"], ["app"], "hello")).await?;
//! ```
//!
//! ## Known limitation
//!
//! Workers can build routes that cycle forever. [`NodeConfig::max_hops`]
//! bounds every routing chain (1024 steps by default) and fails it with
//! [`RoutingError::HopLimitExceeded`] once exceeded.

#![deny(missing_docs)]

mod address;
pub mod config;
mod context;
pub mod error;
mod message;
mod node;
mod node_config;
mod route;
pub mod transport;
mod worker;
pub mod workers;

pub use address::Address;
pub use config::ServerConfig;
pub use context::Context;
pub use error::{RegistrationError, RoutingError, TransportError};
pub use message::Message;
pub use node::{Node, NodeStats};
pub use node_config::{NodeConfig, NodeConfigBuilder, DEFAULT_MAX_HOPS};
pub use route::Route;
pub use worker::{from_fn, FnWorker, Worker};

// Re-exported so implementors don't need a direct dependency.
pub use async_trait::async_trait;
pub use bytes::Bytes;
