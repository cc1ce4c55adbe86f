//! Key-to-location transforms.
//!
//! A [`PathTransform`] turns a logical key into a [`Location`]: a slash-joined directory path
//! plus a leaf file name. The store never caches the result; every call recomputes it, so the
//! transform must be a pure function of the key.

use crate::error::StorageError;
use sha1::{Digest, Sha1};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Width, in hex characters, of every directory fragment produced by [`CasTransform`].
pub const SHARD_WIDTH: usize = 5;

/// Where an object lives relative to its namespace directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    sharded_path: String,
    leaf_name: String,
}

impl Location {
    pub fn new(sharded_path: impl Into<String>, leaf_name: impl Into<String>) -> Self {
        Self { sharded_path: sharded_path.into(), leaf_name: leaf_name.into() }
    }

    /// Slash-joined directory fragments, e.g. `a9993/e3647/...`.
    #[must_use]
    pub fn sharded_path(&self) -> &str {
        &self.sharded_path
    }

    #[must_use]
    pub fn leaf_name(&self) -> &str {
        &self.leaf_name
    }

    /// The first fragment of [`Location::sharded_path`].
    ///
    /// Deletion is scoped to this bucket, not to the single object.
    #[must_use]
    pub fn first_shard_segment(&self) -> &str {
        self.sharded_path.split_once('/').map_or(self.sharded_path.as_str(), |(first, _)| first)
    }

    /// Iterates the fragments of [`Location::sharded_path`].
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.sharded_path.split('/')
    }

    /// `sharded_path/leaf_name`, always slash-separated regardless of platform.
    #[must_use]
    pub fn full_path(&self) -> String {
        format!("{}/{}", self.sharded_path, self.leaf_name)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.sharded_path, self.leaf_name)
    }
}

/// Maps a logical key to a [`Location`].
///
/// Implementations must be deterministic and free of I/O. Any
/// `Fn(&str) -> Location + Send + Sync` closure is a transform as well.
pub trait PathTransform: Send + Sync {
    fn transform(&self, key: &str) -> Location;

    /// Short label used in logs and `Debug` output.
    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> PathTransform for F
where
    F: Fn(&str) -> Location + Send + Sync,
{
    fn transform(&self, key: &str) -> Location {
        self(key)
    }
}

/// Content-addressed layout: SHA-1 of the key, split into [`SHARD_WIDTH`]-character directories.
///
/// ```rust
/// use ggnet_storage::{CasTransform, PathTransform};
///
/// let loc = CasTransform.transform("abc");
/// assert_eq!(loc.leaf_name(), "a9993e364706816aba3e25717850c26c9cd0d89d");
/// assert_eq!(loc.sharded_path(), "a9993/e3647/06816/aba3e/25717/850c2/6c9cd/0d89d");
/// assert_eq!(loc.first_shard_segment(), "a9993");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CasTransform;

impl PathTransform for CasTransform {
    fn transform(&self, key: &str) -> Location {
        let digest = hex::encode(Sha1::digest(key.as_bytes()));

        let fragments: Vec<&str> = (0..digest.len() / SHARD_WIDTH)
            .map(|i| &digest[i * SHARD_WIDTH..(i + 1) * SHARD_WIDTH])
            .collect();

        Location { sharded_path: fragments.join("/"), leaf_name: digest }
    }

    fn name(&self) -> &str {
        "cas"
    }
}

/// Uses the key verbatim as both the directory path and the file name.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransform;

impl PathTransform for IdentityTransform {
    fn transform(&self, key: &str) -> Location {
        Location::new(key, key)
    }

    fn name(&self) -> &str {
        "identity"
    }
}

/// Built-in transforms selectable by name from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransformKind {
    #[default]
    Identity,
    Cas,
}

impl TransformKind {
    #[must_use]
    pub fn into_transform(self) -> Arc<dyn PathTransform> {
        match self {
            Self::Identity => Arc::new(IdentityTransform),
            Self::Cas => Arc::new(CasTransform),
        }
    }
}

impl FromStr for TransformKind {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "identity" | "default" => Ok(Self::Identity),
            "cas" | "sha1" => Ok(Self::Cas),
            other => Err(StorageError::Misconfigured {
                message: format!("Unknown path transform '{other}'").into(),
                context: Some("Expected one of: identity, cas".into()),
            }),
        }
    }
}
