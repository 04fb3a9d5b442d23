//! The routed message envelope.

use crate::address::Address;
use crate::error::RoutingError;
use crate::route::Route;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Unit of communication between workers.
///
/// # Structure
///
/// - `onward_route`: hops still to visit, front = next recipient
/// - `return_route`: hops already visited, front = most recent forwarder
/// - `payload`: opaque bytes, never inspected by the node
///
/// # Invariants
///
/// A message is owned by exactly one dispatch step at a time. Workers
/// receive it by value and hand it back to the node through
/// [`Context::route`](crate::Context::route).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Remaining path, front first.
    pub onward_route: Route,

    /// Path travelled so far, most recent hop first.
    pub return_route: Route,

    /// Application data.
    pub payload: Bytes,
}

impl Message {
    /// Create a new message.
    pub fn new(
        onward_route: impl Into<Route>,
        return_route: impl Into<Route>,
        payload: impl Into<Bytes>,
    ) -> Self {
        Self {
            onward_route: onward_route.into(),
            return_route: return_route.into(),
            payload: payload.into(),
        }
    }

    /// The payload as UTF-8 text, if it is valid UTF-8.
    pub fn payload_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }

    /// Move this message one hop forward on behalf of `me`.
    ///
    /// Pops `me` off the onward route and records it at the front of the
    /// return route. Fails with [`RoutingError::MalformedRoute`] if the
    /// onward route does not start with `me`.
    pub fn step_forward(&mut self, me: &Address) -> Result<(), RoutingError> {
        if self.onward_route.next() != Some(me) {
            return Err(RoutingError::MalformedRoute {
                expected: me.clone(),
                found: self.onward_route.next().cloned(),
            });
        }
        self.onward_route.step()?;
        self.return_route.prepend(me.clone());
        Ok(())
    }

    /// Turn this message around on behalf of `me`.
    ///
    /// The return route becomes the onward route and `me` becomes the
    /// sole entry of the new return route.
    pub fn reverse(&mut self, me: &Address) {
        self.onward_route = std::mem::replace(&mut self.return_route, Route::single(me.clone()));
    }
}
