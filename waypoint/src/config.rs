//! Server configuration.

use std::net::SocketAddr;

use clap::Parser;

use crate::{Address, NodeConfig, Route, DEFAULT_MAX_HOPS};

/// Command-line configuration for the `waypoint` server.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "waypoint")]
#[command(about = "Actor-style message router behind a WebSocket listener", long_about = None)]
pub struct ServerConfig {
    /// Address to listen on for HTTP and WebSocket connections
    #[arg(short, long, default_value = "127.0.0.1:4000")]
    pub listen: SocketAddr,

    /// Onward route for frames that carry only a payload (comma-separated)
    #[arg(long, value_delimiter = ',', default_value = "broadcast")]
    pub default_route: Vec<Address>,

    /// Address the broadcast worker is registered under
    #[arg(long, default_value = "broadcast")]
    pub broadcast_address: Address,

    /// Maximum dispatch steps per routing chain
    #[arg(long, default_value_t = DEFAULT_MAX_HOPS)]
    pub max_hops: usize,

    /// Disable the hop limit entirely
    #[arg(long)]
    pub no_max_hops: bool,

    /// Register the reference workers (h1, h2, h3, echoer, printer)
    #[arg(long)]
    pub reference_workers: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 4000)),
            default_route: vec![Address::from("broadcast")],
            broadcast_address: Address::from("broadcast"),
            max_hops: DEFAULT_MAX_HOPS,
            no_max_hops: false,
            reference_workers: false,
        }
    }
}

impl ServerConfig {
    /// Node configuration derived from the flags.
    pub fn node_config(&self) -> NodeConfig {
        let builder = NodeConfig::builder();
        if self.no_max_hops {
            builder.unbounded().build()
        } else {
            builder.max_hops(self.max_hops).build()
        }
    }

    /// Onward route applied to payload-only frames.
    pub fn default_route(&self) -> Route {
        self.default_route.iter().cloned().collect()
    }
}
