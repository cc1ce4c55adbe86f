//! The blocking object store.
//!
//! [`Store`] owns the storage area and routes every call through the configured
//! [`PathTransform`] and [`Sanitizer`] before touching the filesystem. It holds no lock around
//! object I/O; concurrent writers to the same key race, the last writer wins and writes are not
//! atomic.

use crate::builder::StoreBuilder;
use crate::error::{StorageError, StorageErrorExt};
use crate::namespace::NamespacedStore;
use crate::security::{self, Sanitizer};
use crate::transform::{Location, PathTransform};
use ggnet_cipher::EncryptionKey;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Shared state behind every clone of a [`Store`].
pub(crate) struct StoreInner {
    pub(crate) root: PathBuf,
    pub(crate) storage_dir: PathBuf,
    pub(crate) network_dir: PathBuf,
    pub(crate) listen_address: String,
    pub(crate) transform: Arc<dyn PathTransform>,
    pub(crate) sanitizer: Sanitizer,
}

/// A thread-safe handle to a local object store.
///
/// Objects are addressed by a namespace id and a logical key. The key is mapped to a
/// [`Location`] by the store's transform, and the id plus every location segment is sanitized
/// before the object path `<storage>/<id>/<segments...>/<leaf>` is built.
///
/// The handle is reference-counted and cheap to clone across threads.
///
/// # Example
///
/// ```rust
/// use ggnet_storage::{Store, TransformKind, StorageError};
/// use std::io::Read;
///
/// # fn main() -> Result<(), StorageError> {
/// # let tmp = tempfile::tempdir().unwrap();
/// let store = Store::builder()
///     .root(tmp.path().join("net"))
///     .transform_kind(TransformKind::Cas)
///     .build()?;
///
/// let written = store.write("peerA", "hello.txt", &mut &b"hi"[..])?;
/// assert_eq!(written, 2);
/// assert!(store.has("peerA", "hello.txt"));
///
/// let (size, mut file) = store.read("peerA", "hello.txt")?;
/// let mut body = String::new();
/// file.read_to_string(&mut body).unwrap();
/// assert_eq!((size, body.as_str()), (2, "hi"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Store {
    pub(crate) inner: Arc<StoreInner>,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("storage_dir", &self.inner.storage_dir)
            .field("transform", &self.inner.transform.name())
            .field("sanitizer", &self.inner.sanitizer)
            .finish_non_exhaustive()
    }
}

impl Store {
    #[must_use = "The store is not usable until you call .build()"]
    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    /// The sanitized root the storage and network areas were derived from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.inner.root
    }

    #[must_use]
    pub fn storage_dir(&self) -> &Path {
        &self.inner.storage_dir
    }

    /// Reserved for the network layer. The store never creates or touches it.
    #[must_use]
    pub fn network_dir(&self) -> &Path {
        &self.inner.network_dir
    }

    #[must_use]
    pub fn listen_address(&self) -> &str {
        &self.inner.listen_address
    }

    #[must_use]
    pub fn transform(&self) -> &dyn PathTransform {
        self.inner.transform.as_ref()
    }

    #[must_use]
    pub fn sanitizer(&self) -> Sanitizer {
        self.inner.sanitizer
    }

    /// Runs the configured transform. Recomputed on every call.
    #[must_use]
    pub fn location(&self, key: &str) -> Location {
        self.inner.transform.transform(key)
    }

    /// Returns a view bound to a single namespace id.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::PathTraversalAttempt`] if the id does not sanitize to a single
    /// directory name.
    pub fn namespace(&self, id: &str) -> Result<NamespacedStore, StorageError> {
        security::namespace_path(&self.inner.storage_dir, self.inner.sanitizer, id)?;
        Ok(NamespacedStore::new(self.clone(), id))
    }

    /// Computes the sanitized on-disk path of an object without touching the filesystem.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::PathTraversalAttempt`] if the id or any location segment would
    /// resolve to an empty, `.`, `..` or rooted component.
    pub fn resolve(&self, id: &str, key: &str) -> Result<PathBuf, StorageError> {
        let location = self.location(key);
        security::object_path(&self.inner.storage_dir, self.inner.sanitizer, id, &location)
    }

    /// Reports whether an object exists. Every failure, including a rejected path, is `false`.
    #[must_use]
    pub fn has(&self, id: &str, key: &str) -> bool {
        self.resolve(id, key).is_ok_and(|path| path.exists())
    }

    /// Copies `source` into the object for `key`, creating or truncating it.
    ///
    /// Parent directories are created as needed. A failed copy leaves whatever was written so
    /// far in place.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::PathTraversalAttempt`] on an unsafe path and
    /// [`StorageError::Io`] if directories cannot be created or the copy fails.
    pub fn write<R: Read + ?Sized>(
        &self,
        id: &str,
        key: &str,
        source: &mut R,
    ) -> Result<u64, StorageError> {
        let (path, mut file) = self.create_object(id, key)?;

        let written =
            io::copy(source, &mut file).context(format!("Write failed: {}", path.display()))?;

        debug!(path = %path.display(), bytes = written, "Object written");
        Ok(written)
    }

    /// Like [`Store::write`], but `source` carries `[IV][AES-256-CTR ciphertext]` and the
    /// plaintext is what lands on disk. Decryption is streamed chunk by chunk.
    ///
    /// Returns the number of plaintext bytes written.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Cipher`] if the IV is truncated or reading/writing the stream
    /// fails mid-copy, plus everything [`Store::write`] can return.
    pub fn write_decrypted<R: Read + ?Sized>(
        &self,
        key_material: &EncryptionKey,
        id: &str,
        key: &str,
        source: &mut R,
    ) -> Result<u64, StorageError> {
        let (path, mut file) = self.create_object(id, key)?;

        let written = ggnet_cipher::copy_decrypt(key_material, source, &mut file)
            .context(format!("Decrypting into {}", path.display()))?;

        debug!(path = %path.display(), bytes = written, "Decrypted object written");
        Ok(written)
    }

    /// Opens an object for reading.
    ///
    /// Returns the size reported by filesystem metadata and the open file. The file is
    /// closed when dropped.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if nothing (or only a directory) lives at the path.
    pub fn read(&self, id: &str, key: &str) -> Result<(u64, File), StorageError> {
        let path = self.resolve(id, key)?;

        let file = match File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(not_found(id, key));
            },
            Err(err) => {
                return Err(StorageError::Io {
                    source: err,
                    context: Some(format!("Open failed: {}", path.display()).into()),
                });
            },
        };

        let meta = file.metadata().context(format!("Stat failed: {}", path.display()))?;
        if meta.is_dir() {
            return Err(not_found(id, key));
        }

        debug!(path = %path.display(), bytes = meta.len(), "Object opened");
        Ok((meta.len(), file))
    }

    /// Deletes the object for `key` using [`Store::delete_by_prefix_bucket`].
    ///
    /// Every other object in the same namespace whose location starts with the same first
    /// shard segment is removed as well.
    ///
    /// # Errors
    ///
    /// See [`Store::delete_by_prefix_bucket`].
    pub fn delete(&self, id: &str, key: &str) -> Result<(), StorageError> {
        self.delete_by_prefix_bucket(id, key)
    }

    /// Removes `<storage>/<id>/<first shard segment of key>` recursively.
    ///
    /// With the CAS transform the bucket is one of 16^5 hash prefixes; with the identity
    /// transform it is the first `/`-separated part of the key. Missing buckets are not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::PathTraversalAttempt`] on an unsafe path and
    /// [`StorageError::Io`] if removal fails.
    pub fn delete_by_prefix_bucket(&self, id: &str, key: &str) -> Result<(), StorageError> {
        let location = self.location(key);
        let bucket = security::prefix_bucket_path(
            &self.inner.storage_dir,
            self.inner.sanitizer,
            id,
            &location,
        )?;

        if remove_tree(&bucket)? {
            debug!(path = %bucket.display(), "Prefix bucket removed");
        }
        Ok(())
    }

    /// Removes every object stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::PathTraversalAttempt`] on an unsafe id and
    /// [`StorageError::Io`] if removal fails.
    pub fn delete_namespace(&self, id: &str) -> Result<(), StorageError> {
        let path = security::namespace_path(&self.inner.storage_dir, self.inner.sanitizer, id)?;

        if remove_tree(&path)? {
            info!(path = %path.display(), "Namespace removed");
        }
        Ok(())
    }

    /// Recursively removes the whole storage area. The next write recreates it.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if removal fails for a reason other than absence.
    pub fn clear(&self) -> Result<(), StorageError> {
        let removed = remove_tree(&self.inner.storage_dir)?;
        info!(path = %self.inner.storage_dir.display(), removed, "Storage area cleared");
        Ok(())
    }

    fn create_object(&self, id: &str, key: &str) -> Result<(PathBuf, File), StorageError> {
        let path = self.resolve(id, key)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .context(format!("Failed to create shards for {}", path.display()))?;
        }

        let file =
            File::create(&path).context(format!("Failed to create {}", path.display()))?;
        Ok((path, file))
    }
}

fn not_found(id: &str, key: &str) -> StorageError {
    StorageError::NotFound { message: format!("{id}/{key}").into(), context: None }
}

/// `rm -rf` for a single path. Returns whether anything was removed.
fn remove_tree(path: &Path) -> Result<bool, StorageError> {
    let result = match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(StorageError::Io {
            source: err,
            context: Some(format!("Failed to remove {}", path.display()).into()),
        }),
    }
}
