use async_trait::async_trait;

use crate::{Context, Message, RoutingError, Worker};

/// Sends every message back the way it came.
///
/// The return route becomes the onward route and the echoer becomes the
/// sole entry of the new return route.
#[derive(Debug, Clone, Copy, Default)]
pub struct Echoer;

#[async_trait]
impl Worker for Echoer {
    async fn handle_message(
        &mut self,
        ctx: &mut Context,
        mut msg: Message,
    ) -> Result<(), RoutingError> {
        msg.reverse(ctx.address());
        tracing::debug!(address = %ctx.address(), onward = %msg.onward_route, "echo");
        ctx.route(msg)
    }
}
