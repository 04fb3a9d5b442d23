use async_trait::async_trait;

use crate::{Context, Message, RoutingError, Worker};

/// Transparent relay.
///
/// Removes its own address from the front of the onward route, pushes it
/// onto the front of the return route and forwards the message.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hop;

#[async_trait]
impl Worker for Hop {
    async fn handle_message(
        &mut self,
        ctx: &mut Context,
        mut msg: Message,
    ) -> Result<(), RoutingError> {
        msg.step_forward(ctx.address())?;
        tracing::debug!(address = %ctx.address(), next = ?msg.onward_route.next(), "hop");
        ctx.route(msg)
    }
}
