use async_trait::async_trait;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{Context, Message, RoutingError, Worker};

/// Terminal endpoint that hands delivered messages to a channel.
///
/// Unlike [`Printer`](super::Printer), an inbox consumes its own hop:
/// the message it passes on has the inbox's address removed from the
/// front of the onward route, so the receiver sees exactly the
/// addresses that were left after it. Nothing is re-routed.
#[derive(Debug, Clone)]
pub struct Inbox {
    tx: UnboundedSender<Message>,
}

impl Inbox {
    /// Create an inbox and the receiving end of its channel.
    pub fn channel() -> (Self, UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl Worker for Inbox {
    async fn handle_message(
        &mut self,
        ctx: &mut Context,
        mut msg: Message,
    ) -> Result<(), RoutingError> {
        if msg.onward_route.next() != Some(ctx.address()) {
            return Err(RoutingError::MalformedRoute {
                expected: ctx.address().clone(),
                found: msg.onward_route.next().cloned(),
            });
        }
        msg.onward_route.step()?;

        if self.tx.send(msg).is_err() {
            tracing::debug!(address = %ctx.address(), "inbox receiver dropped, message discarded");
        }
        Ok(())
    }
}
