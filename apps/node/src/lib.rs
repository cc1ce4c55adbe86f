//! # ggnet node
//!
//! Wires configuration, the object store and the peer table into a [`Node`], and runs the
//! command-line operations against it.
//!
//! ## Example
//! ```rust
//! use ggnet_node::Node;
//!
//! # fn main() -> anyhow::Result<()> {
//! # let tmp = tempfile::tempdir()?;
//! let node = Node::builder().root(tmp.path().join("net")).transform("cas").build()?;
//!
//! node.store().write("peerA", "hello.txt", &mut &b"hi"[..])?;
//! assert!(node.store().has("peerA", "hello.txt"));
//! assert!(node.peers().is_empty());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod commands;

use anyhow::{Context, Result};
use ggnet_kernel::config::NodeConfig;
use ggnet_peers::PeerTable;
use ggnet_storage::{Sanitizer, Store, TransformKind};
use std::net::TcpStream;
use std::path::PathBuf;
use tracing::info;

/// Live connection type the network layer registers in the peer table.
pub type Connection = TcpStream;

/// A fluent builder for [`Node`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct NodeBuilder {
    cfg: NodeConfig,
}

impl NodeBuilder {
    pub fn config(mut self, cfg: NodeConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.cfg.store.root = root.into();
        self
    }

    pub fn transform(mut self, transform: impl Into<String>) -> Self {
        self.cfg.store.transform = transform.into();
        self
    }

    pub fn sanitizer(mut self, sanitizer: impl Into<String>) -> Self {
        self.cfg.store.sanitizer = sanitizer.into();
        self
    }

    /// Opens the store and creates an empty peer table.
    ///
    /// # Errors
    /// Fails on an unknown transform or sanitizer name, an unusable root, or when the storage
    /// area cannot be created.
    pub fn build(self) -> Result<Node> {
        let cfg = self.cfg;

        let transform: TransformKind =
            cfg.store.transform.parse().context("Invalid `store.transform`")?;
        let sanitizer: Sanitizer =
            cfg.store.sanitizer.parse().context("Invalid `store.sanitizer`")?;

        let store = Store::builder()
            .root(&cfg.store.root)
            .transform_kind(transform)
            .sanitizer(sanitizer)
            .listen_address(cfg.network.listen_address.as_str())
            .build()
            .with_context(|| format!("Failed to open store at {}", cfg.store.root.display()))?;

        info!(
            storage = %store.storage_dir().display(),
            transform = store.transform().name(),
            listen = %store.listen_address(),
            "Node ready"
        );

        Ok(Node { cfg, store, peers: PeerTable::new() })
    }
}

/// A local node: its configuration, object store and peer table.
#[derive(Debug, Clone)]
pub struct Node {
    cfg: NodeConfig,
    store: Store,
    peers: PeerTable<Connection>,
}

impl Node {
    pub fn builder() -> NodeBuilder {
        NodeBuilder::default()
    }

    #[must_use]
    pub const fn config(&self) -> &NodeConfig {
        &self.cfg
    }

    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }

    #[must_use]
    pub const fn peers(&self) -> &PeerTable<Connection> {
        &self.peers
    }

    #[must_use]
    pub fn listen_address(&self) -> &str {
        self.store.listen_address()
    }
}
