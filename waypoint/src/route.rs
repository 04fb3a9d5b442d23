//! Routes: ordered address sequences consumed from the front.

use crate::address::Address;
use crate::error::RoutingError;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// An ordered sequence of [`Address`]es, front = next hop.
///
/// Once built, a route can only be mutated at the front: [`Route::step`]
/// pops the next hop and [`Route::prepend`] pushes a new one. Onward
/// routes shrink as a message travels; return routes grow with the most
/// recent hop first.
///
/// # Examples
///
/// ```rust
/// use waypoint::Route;
///
/// let mut route = Route::new().append("h1").append("echoer");
/// assert_eq!(route.step().unwrap(), "h1");
/// assert_eq!(route.next().unwrap(), "echoer");
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Route {
    inner: VecDeque<Address>,
}

impl Route {
    /// Create an empty route.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a route with a single address.
    pub fn single(address: impl Into<Address>) -> Self {
        Self::new().append(address)
    }

    /// Builder step: add an address at the back of the route.
    pub fn append(mut self, address: impl Into<Address>) -> Self {
        self.inner.push_back(address.into());
        self
    }

    /// Peek at the next hop without removing it.
    pub fn next(&self) -> Option<&Address> {
        self.inner.front()
    }

    /// The final address of the route.
    pub fn last(&self) -> Option<&Address> {
        self.inner.back()
    }

    /// Remove and return the next hop.
    pub fn step(&mut self) -> Result<Address, RoutingError> {
        self.inner.pop_front().ok_or(RoutingError::EmptyRoute)
    }

    /// Push an address onto the front of the route.
    pub fn prepend(&mut self, address: impl Into<Address>) {
        self.inner.push_front(address.into());
    }

    /// Number of addresses left in the route.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// True when no hops remain.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate over the addresses, front first.
    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.inner.iter()
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.iter()).finish()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, address) in self.inner.iter().enumerate() {
            if i > 0 {
                f.write_str(" => ")?;
            }
            write!(f, "{address}")?;
        }
        f.write_str("]")
    }
}

impl<A: Into<Address>> FromIterator<A> for Route {
    fn from_iter<T: IntoIterator<Item = A>>(iter: T) -> Self {
        Self {
            inner: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<A: Into<Address>> From<Vec<A>> for Route {
    fn from(addresses: Vec<A>) -> Self {
        addresses.into_iter().collect()
    }
}

impl<A: Into<Address>, const N: usize> From<[A; N]> for Route {
    fn from(addresses: [A; N]) -> Self {
        addresses.into_iter().collect()
    }
}

impl From<Address> for Route {
    fn from(address: Address) -> Self {
        Self::single(address)
    }
}
