//! A local, content-addressable object store.
//!
//! Objects are byte streams addressed by a namespace id (the owner, usually a peer address) and
//! a logical key. A pluggable [`PathTransform`] maps the key to a [`Location`], and every path
//! segment is sanitized and checked before it reaches the filesystem.
//!
//! # Layout
//!
//! A store rooted at `X` uses two sibling directories:
//!
//! - `X_storage` holds objects at `<id>/<shard segments...>/<leaf>`.
//! - `X_network` is reserved for the network layer and never touched here.
//!
//! With [`CasTransform`] the key `hello.txt` lands at
//! `X_storage/<id>/3857b/67247/1862e/.../3857b672471862eab426eba0622e44bd2cedbd5d`.
//!
//! # Deletion
//!
//! [`Store::delete`] is coarse: it removes the whole first-segment bucket of the
//! key's location, taking neighbours that share that bucket with it. Use
//! [`Store::delete_namespace`] to drop everything an id owns.
//!
//! # Examples
//!
//! ```rust
//! use ggnet_storage::{Sanitizer, Store, StorageError, TransformKind};
//!
//! # fn main() -> Result<(), StorageError> {
//! # let tmp = tempfile::tempdir().unwrap();
//! let store = Store::builder()
//!     .root(tmp.path().join("net"))
//!     .transform_kind(TransformKind::Cas)
//!     .sanitizer(Sanitizer::Strict)
//!     .build()?;
//!
//! let peer = store.namespace("peerA")?;
//! peer.write("hello.txt", &mut &b"hi"[..])?;
//! assert!(peer.has("hello.txt"));
//!
//! peer.delete("hello.txt")?;
//! assert!(!peer.has("hello.txt"));
//! # Ok(())
//! # }
//! ```

mod builder;
mod engine;
mod error;
mod namespace;
mod security;
mod transform;

pub use builder::{NoRoot, StoreBuilder, WithRoot};
pub use engine::Store;
pub use error::{StorageError, StorageErrorExt};
pub use namespace::NamespacedStore;
pub use security::{Sanitizer, is_reserved, sanitize_lenient, sanitize_strict};
pub use transform::{
    CasTransform, IdentityTransform, Location, PathTransform, SHARD_WIDTH, TransformKind,
};
