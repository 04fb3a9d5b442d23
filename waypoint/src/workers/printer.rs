use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;

use crate::{Context, Message, RoutingError, Worker};

/// Terminal observer.
///
/// Logs each message and never re-routes it. With a sink attached, an
/// unmodified copy of every received message is also forwarded to the
/// channel, which is how tests and embedders observe final delivery.
#[derive(Debug, Clone, Default)]
pub struct Printer {
    sink: Option<UnboundedSender<Message>>,
}

impl Printer {
    /// A printer that only logs.
    pub fn new() -> Self {
        Self::default()
    }

    /// A printer that logs and forwards each message to `sink`.
    pub fn with_sink(sink: UnboundedSender<Message>) -> Self {
        Self { sink: Some(sink) }
    }
}

#[async_trait]
impl Worker for Printer {
    async fn handle_message(&mut self, ctx: &mut Context, msg: Message) -> Result<(), RoutingError> {
        match msg.payload_text() {
            Some(text) => tracing::info!(
                address = %ctx.address(),
                return_route = %msg.return_route,
                "received: {text}"
            ),
            None => tracing::info!(
                address = %ctx.address(),
                return_route = %msg.return_route,
                bytes = msg.payload.len(),
                "received binary payload"
            ),
        }

        if let Some(sink) = &self.sink {
            // Receiver gone just means nobody is watching any more
            let _ = sink.send(msg);
        }
        Ok(())
    }
}
