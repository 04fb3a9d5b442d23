//! Node: worker registry and dispatch loop.
//!
//! The node owns every registered [`Worker`] by [`Address`] and moves
//! messages between them one hop at a time.
//!
//! # Dispatch
//!
//! ```text
//! route(msg)
//!   └─ pending = [msg]
//!      loop:
//!        1. pop front of pending
//!        2. onward route empty?     → done with this message
//!        3. look up front address   → UnknownAddress if absent
//!        4. lock that worker only, call handle_message(ctx, msg)
//!        5. append everything the worker passed to ctx.route()
//! ```
//!
//! The node never steps the route itself. Hop, reversal and absorption
//! are decided by the workers.
//!
//! Routing is a trampoline rather than recursion: a worker calling
//! [`Context::route`] only queues the message, and the loop above picks
//! it up after the handler returns. Chain length therefore does not grow
//! the stack, and a chain that passes through the same worker twice
//! (h1 → echoer → h1) never waits on a lock it already holds.
//!
//! A handler that instead awaits `ctx.node().route(..)` starts a nested
//! chain on the same task while still holding its own lock. The node
//! tracks which workers are busy further up the current task and fails
//! a nested delivery to any of them with [`RoutingError::Reentrant`].
//!
//! # Concurrency
//!
//! `Node` is `Send + Sync` and cheap to clone. Independent `route` calls
//! run in parallel: the registry lock is only held for lookups and
//! registration, and each worker has its own lock held only while its
//! handler runs.

use std::cell::RefCell;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bytes::Bytes;
use futures::FutureExt;
use tokio::sync::Mutex;

use crate::address::Address;
use crate::context::Context;
use crate::error::{RegistrationError, RoutingError};
use crate::message::Message;
use crate::node_config::NodeConfig;
use crate::route::Route;
use crate::worker::Worker;

type SharedWorker = Arc<Mutex<Box<dyn Worker>>>;

tokio::task_local! {
    // Workers whose handler is running further up the current task.
    static ACTIVE: RefCell<Vec<Address>>;
}

/// Marks `address` busy for the current task until dropped.
struct ActiveGuard {
    address: Address,
}

impl ActiveGuard {
    fn enter(address: &Address) -> Result<Self, RoutingError> {
        let busy = ACTIVE
            .try_with(|active| {
                let mut active = active.borrow_mut();
                if active.contains(address) {
                    return true;
                }
                active.push(address.clone());
                false
            })
            .unwrap_or(false);
        if busy {
            return Err(RoutingError::Reentrant(address.clone()));
        }
        Ok(Self {
            address: address.clone(),
        })
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        let _ = ACTIVE.try_with(|active| {
            let mut active = active.borrow_mut();
            if let Some(pos) = active.iter().rposition(|a| *a == self.address) {
                active.remove(pos);
            }
        });
    }
}

/// Point-in-time counters for a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeStats {
    /// Number of registered workers.
    pub workers: usize,
    /// Handler invocations completed (successfully or not).
    pub dispatched: u64,
    /// Routing chains that ended in an error.
    pub failed: u64,
}

struct NodeInner {
    config: NodeConfig,
    registry: RwLock<HashMap<Address, SharedWorker>>,
    dispatched: AtomicU64,
    failed: AtomicU64,
}

/// Registry of workers plus the dispatcher that routes between them.
///
/// # Example
///
/// ```rust,ignore
/// let node = Node::new();
/// node.start_worker("h1", Hop)?;
/// node.start_worker("echoer", Echoer)?;
/// node.start_worker("app", Printer::new())?;
///
/// node.route(Message::new(["h1", "echoer"], ["app"], "hello")).await?;
/// ```
#[derive(Clone)]
pub struct Node {
    inner: Arc<NodeInner>,
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

impl Node {
    /// Create a node with the default configuration.
    pub fn new() -> Self {
        Self::with_config(NodeConfig::default())
    }

    /// Create a node with an explicit configuration.
    pub fn with_config(config: NodeConfig) -> Self {
        Self {
            inner: Arc::new(NodeInner {
                config,
                registry: RwLock::new(HashMap::new()),
                dispatched: AtomicU64::new(0),
                failed: AtomicU64::new(0),
            }),
        }
    }

    /// The configuration this node was built with.
    pub fn config(&self) -> &NodeConfig {
        &self.inner.config
    }

    // Handlers never run under the registry lock, so a poisoned lock
    // still guards a consistent map.
    fn registry(&self) -> RwLockReadGuard<'_, HashMap<Address, SharedWorker>> {
        self.inner
            .registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn registry_mut(&self) -> RwLockWriteGuard<'_, HashMap<Address, SharedWorker>> {
        self.inner
            .registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `worker` under `address`.
    ///
    /// Fails with [`RegistrationError::DuplicateAddress`] if the address is
    /// taken; the existing worker is kept.
    pub fn start_worker<W: Worker>(
        &self,
        address: impl Into<Address>,
        worker: W,
    ) -> Result<(), RegistrationError> {
        let address = address.into();
        let worker: Box<dyn Worker> = Box::new(worker);
        match self.registry_mut().entry(address) {
            Entry::Occupied(entry) => {
                tracing::warn!(address = %entry.key(), "address already registered");
                Err(RegistrationError::DuplicateAddress(entry.key().clone()))
            }
            Entry::Vacant(entry) => {
                tracing::debug!(address = %entry.key(), "worker started");
                entry.insert(Arc::new(Mutex::new(worker)));
                Ok(())
            }
        }
    }

    /// Remove the worker registered under `address`.
    ///
    /// A handler already running for that worker finishes normally.
    pub fn stop_worker(&self, address: &Address) -> Result<(), RegistrationError> {
        match self.registry_mut().remove(address) {
            Some(_) => {
                tracing::debug!(address = %address, "worker stopped");
                Ok(())
            }
            None => Err(RegistrationError::NotRegistered(address.clone())),
        }
    }

    /// Whether a worker is registered under `address`.
    pub fn has_worker(&self, address: &Address) -> bool {
        self.registry().contains_key(address)
    }

    /// All registered addresses, sorted.
    pub fn workers(&self) -> Vec<Address> {
        let mut addresses: Vec<Address> = self.registry().keys().cloned().collect();
        addresses.sort();
        addresses
    }

    /// Snapshot of the node's counters.
    pub fn stats(&self) -> NodeStats {
        NodeStats {
            workers: self.registry().len(),
            dispatched: self.inner.dispatched.load(Ordering::Relaxed),
            failed: self.inner.failed.load(Ordering::Relaxed),
        }
    }

    fn lookup(&self, address: &Address) -> Result<SharedWorker, RoutingError> {
        self.registry()
            .get(address)
            .cloned()
            .ok_or_else(|| RoutingError::UnknownAddress(address.clone()))
    }

    /// Route a fresh message with an empty return route.
    pub async fn send(
        &self,
        route: impl Into<Route>,
        payload: impl Into<Bytes>,
    ) -> Result<(), RoutingError> {
        self.route(Message::new(route, Route::new(), payload)).await
    }

    /// Route `message` until every branch of its chain terminates.
    ///
    /// Returns `Ok(())` once all messages produced by the chain have an
    /// empty onward route or were absorbed by a worker. The first error
    /// aborts the chain and is returned; messages still queued for that
    /// chain are dropped.
    ///
    /// Called from inside a handler, a chain that reaches a worker still
    /// busy further up the same call fails with
    /// [`RoutingError::Reentrant`].
    #[tracing::instrument(level = "debug", skip_all, fields(onward = %message.onward_route))]
    pub async fn route(&self, message: Message) -> Result<(), RoutingError> {
        if ACTIVE.try_with(|_| ()).is_ok() {
            self.run_chain(message).await
        } else {
            ACTIVE
                .scope(RefCell::new(Vec::new()), self.run_chain(message))
                .await
        }
    }

    async fn run_chain(&self, message: Message) -> Result<(), RoutingError> {
        let mut pending = VecDeque::from([message]);
        let mut hops = 0usize;

        while let Some(message) = pending.pop_front() {
            match self.dispatch(message, &mut hops).await {
                Ok(routed) => pending.extend(routed),
                Err(err) => {
                    self.inner.failed.fetch_add(1, Ordering::Relaxed);
                    if !pending.is_empty() {
                        tracing::warn!(
                            dropped = pending.len(),
                            error = %err,
                            "routing chain aborted"
                        );
                    }
                    return Err(err);
                }
            }
        }

        Ok(())
    }

    /// One dispatch step: deliver `message` to the front of its onward route.
    async fn dispatch(
        &self,
        message: Message,
        hops: &mut usize,
    ) -> Result<Vec<Message>, RoutingError> {
        let Some(address) = message.onward_route.next().cloned() else {
            tracing::trace!("empty onward route, nothing to deliver");
            return Ok(Vec::new());
        };

        if let Some(max) = self.inner.config.max_hops() {
            if *hops >= max {
                tracing::warn!(address = %address, max, "hop limit reached");
                return Err(RoutingError::HopLimitExceeded { max });
            }
        }
        *hops += 1;

        let worker = self.lookup(&address)?;
        let mut ctx = Context::new(address.clone(), self.clone());

        tracing::debug!(
            address = %address,
            onward = %message.onward_route,
            return_route = %message.return_route,
            "delivering message"
        );

        let outcome = {
            let _active = ActiveGuard::enter(&address).inspect_err(|_| {
                tracing::warn!(address = %address, "nested route re-enters a busy worker");
            })?;
            let mut guard = worker.lock().await;
            AssertUnwindSafe(guard.handle_message(&mut ctx, message))
                .catch_unwind()
                .await
        };
        self.inner.dispatched.fetch_add(1, Ordering::Relaxed);

        match outcome {
            Ok(Ok(())) => Ok(ctx.into_outbox()),
            Ok(Err(err)) => {
                tracing::debug!(address = %address, error = %err, "worker returned an error");
                Err(err)
            }
            Err(_) => {
                tracing::error!(address = %address, "worker panicked while handling a message");
                Err(RoutingError::WorkerPanicked(address))
            }
        }
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("config", &self.inner.config)
            .field("workers", &self.workers())
            .finish()
    }
}
