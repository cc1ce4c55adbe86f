//! # Peers
//!
//! The connection table a network layer fills as peers come and go.
//!
//! [`PeerTable`] maps a peer's address to whatever the transport uses as a live connection. It
//! is generic over the connection type so the table carries no transport dependency. The map
//! sits behind one `parking_lot::Mutex`; clones share it.
//!
//! ```rust
//! use ggnet_peers::PeerTable;
//!
//! let peers: PeerTable<u32> = PeerTable::new();
//! peers.insert("10.0.0.2:3000", 7);
//!
//! assert!(peers.contains("10.0.0.2:3000"));
//! assert_eq!(peers.with_peer("10.0.0.2:3000", |conn| *conn + 1), Some(8));
//! ```

use fxhash::FxHashMap;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Shared map from peer address to connection.
pub struct PeerTable<C> {
    peers: Arc<Mutex<FxHashMap<String, C>>>,
}

impl<C> PeerTable<C> {
    #[must_use]
    pub fn new() -> Self {
        Self { peers: Arc::new(Mutex::new(FxHashMap::default())) }
    }

    /// Registers a connection, returning the one it replaced.
    pub fn insert(&self, address: impl Into<String>, connection: C) -> Option<C> {
        let address = address.into();
        let previous = self.peers.lock().insert(address.clone(), connection);

        if previous.is_some() {
            warn!(peer = %address, "Replaced existing peer connection");
        } else {
            debug!(peer = %address, "Peer registered");
        }
        previous
    }

    pub fn remove(&self, address: &str) -> Option<C> {
        let removed = self.peers.lock().remove(address);
        if removed.is_some() {
            debug!(peer = %address, "Peer removed");
        }
        removed
    }

    #[must_use]
    pub fn contains(&self, address: &str) -> bool {
        self.peers.lock().contains_key(address)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.peers.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.peers.lock().is_empty()
    }

    /// Snapshot of the registered addresses, sorted.
    #[must_use]
    pub fn addresses(&self) -> Vec<String> {
        let mut addresses: Vec<String> = self.peers.lock().keys().cloned().collect();
        addresses.sort_unstable();
        addresses
    }

    /// Runs `f` on one connection while the table is locked.
    ///
    /// Keep `f` short: every other table operation waits on it.
    pub fn with_peer<R>(&self, address: &str, f: impl FnOnce(&mut C) -> R) -> Option<R> {
        self.peers.lock().get_mut(address).map(f)
    }
}

impl<C> Default for PeerTable<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for PeerTable<C> {
    fn clone(&self) -> Self {
        Self { peers: Arc::clone(&self.peers) }
    }
}

impl<C> fmt::Debug for PeerTable<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeerTable").field("peers", &self.addresses()).finish()
    }
}
