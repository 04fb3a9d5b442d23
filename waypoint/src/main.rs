//! `waypoint` server binary.
//!
//! ```bash
//! cargo run -- --listen 127.0.0.1:4000 --reference-workers
//! ```
//!
//! Connect with any WebSocket client. Plain text frames are broadcast to
//! every other client; JSON frames such as
//! `{"onward_route": ["h1", "h2", "echoer"], "payload": "hello"}` travel
//! through the named workers and come back to the sender.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use waypoint::transport::Server;
use waypoint::workers::start_reference_workers;
use waypoint::{Node, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,waypoint=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let node = Node::with_config(config.node_config());
    if config.reference_workers {
        start_reference_workers(&node)?;
        tracing::info!(workers = ?node.workers(), "reference workers started");
    }

    tracing::info!(listen = %config.listen, max_hops = ?node.config().max_hops(), "starting waypoint");
    if let Err(err) = Server::new(node, config)?.run().await {
        tracing::error!(error = %err, "server failed");
        return Err(err.into());
    }
    Ok(())
}
