//! Per-node configuration for [`Node`](crate::Node).

/// Default bound on dispatch steps per routing chain.
pub const DEFAULT_MAX_HOPS: usize = 1024;

/// Per-node configuration for a [`Node`](crate::Node).
///
/// # Example
///
/// ```rust
/// use waypoint::NodeConfig;
///
/// // Default hop limit
/// let config = NodeConfig::default();
/// assert_eq!(config.max_hops(), Some(1024));
///
/// // Full control via builder
/// let config = NodeConfig::builder().max_hops(16).build();
/// assert_eq!(config.max_hops(), Some(16));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    max_hops: Option<usize>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            max_hops: Some(DEFAULT_MAX_HOPS),
        }
    }
}

impl NodeConfig {
    /// Start building a node configuration.
    pub fn builder() -> NodeConfigBuilder {
        NodeConfigBuilder::default()
    }

    /// Maximum dispatch steps a single routing chain may take.
    ///
    /// `None` means unbounded: a cycle of forwarding workers then never
    /// terminates.
    pub fn max_hops(&self) -> Option<usize> {
        self.max_hops
    }
}

/// Builder for [`NodeConfig`].
#[derive(Debug, Clone, Default)]
pub struct NodeConfigBuilder {
    max_hops: Option<Option<usize>>,
}

impl NodeConfigBuilder {
    /// Bound each routing chain to `max` dispatch steps.
    pub fn max_hops(mut self, max: usize) -> Self {
        self.max_hops = Some(Some(max));
        self
    }

    /// Disable the hop limit.
    pub fn unbounded(mut self) -> Self {
        self.max_hops = Some(None);
        self
    }

    /// Build the node configuration (infallible).
    pub fn build(self) -> NodeConfig {
        NodeConfig {
            max_hops: self.max_hops.unwrap_or(Some(DEFAULT_MAX_HOPS)),
        }
    }
}
