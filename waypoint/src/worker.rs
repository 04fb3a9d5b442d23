//! The worker capability.

use crate::context::Context;
use crate::error::RoutingError;
use crate::message::Message;
use async_trait::async_trait;

/// A unit of behaviour bound to an [`Address`](crate::Address) on a node.
///
/// The node invokes `handle_message` whenever a message's onward route
/// names the worker's address. Routing is worker-driven: the node does
/// not touch the route after delivery, so each worker decides how to
/// rewrite the onward and return routes before handing the message back
/// through [`Context::route`]. A worker that never calls `route` is a
/// terminal recipient.
///
/// The node holds a per-worker lock for the duration of the call, so
/// `&mut self` state is safe. Other workers keep running meanwhile.
/// A handler that awaits a nested [`Node::route`](crate::Node::route)
/// cannot be reached again by that nested chain; see
/// [`Context::node`].
///
/// # Example
///
/// ```rust,ignore
/// struct Upper;
///
/// #[async_trait]
/// impl Worker for Upper {
///     async fn handle_message(&mut self, ctx: &mut Context, mut msg: Message) -> Result<(), RoutingError> {
///         let text = msg.payload_text().unwrap_or_default().to_uppercase();
///         msg.payload = text.into();
///         msg.step_forward(ctx.address())?;
///         ctx.route(msg)
///     }
/// }
/// ```
#[async_trait]
pub trait Worker: Send + 'static {
    /// Called for every message routed to this worker's address.
    async fn handle_message(&mut self, ctx: &mut Context, msg: Message)
        -> Result<(), RoutingError>;
}

/// A worker backed by a plain synchronous closure.
///
/// Created with [`from_fn`].
pub struct FnWorker<F> {
    handler: F,
}

/// Wrap a closure as a [`Worker`].
///
/// # Example
///
/// ```rust,ignore
/// node.start_worker("sink", from_fn(|ctx, msg| {
///     tracing::info!(address = %ctx.address(), "got {:?}", msg.payload);
///     Ok(())
/// }))?;
/// ```
pub fn from_fn<F>(handler: F) -> FnWorker<F>
where
    F: FnMut(&mut Context, Message) -> Result<(), RoutingError> + Send + 'static,
{
    FnWorker { handler }
}

#[async_trait]
impl<F> Worker for FnWorker<F>
where
    F: FnMut(&mut Context, Message) -> Result<(), RoutingError> + Send + 'static,
{
    async fn handle_message(
        &mut self,
        ctx: &mut Context,
        msg: Message,
    ) -> Result<(), RoutingError> {
        (self.handler)(ctx, msg)
    }
}
