use crate::engine::Store;
use crate::error::StorageError;
use ggnet_cipher::EncryptionKey;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

/// A [`Store`] view bound to one namespace id.
///
/// Obtained through [`Store::namespace`], which validates the id once. Cloning shares the
/// parent store and the id.
#[derive(Debug, Clone)]
pub struct NamespacedStore {
    store: Store,
    id: Arc<str>,
}

impl NamespacedStore {
    pub(crate) fn new(store: Store, id: &str) -> Self {
        Self { store, id: Arc::from(id) }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }

    /// # Errors
    ///
    /// See [`Store::resolve`].
    pub fn resolve(&self, key: &str) -> Result<PathBuf, StorageError> {
        self.store.resolve(&self.id, key)
    }

    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.store.has(&self.id, key)
    }

    /// # Errors
    ///
    /// See [`Store::write`].
    pub fn write<R: Read + ?Sized>(&self, key: &str, source: &mut R) -> Result<u64, StorageError> {
        self.store.write(&self.id, key, source)
    }

    /// # Errors
    ///
    /// See [`Store::write_decrypted`].
    pub fn write_decrypted<R: Read + ?Sized>(
        &self,
        key_material: &EncryptionKey,
        key: &str,
        source: &mut R,
    ) -> Result<u64, StorageError> {
        self.store.write_decrypted(key_material, &self.id, key, source)
    }

    /// # Errors
    ///
    /// See [`Store::read`].
    pub fn read(&self, key: &str) -> Result<(u64, File), StorageError> {
        self.store.read(&self.id, key)
    }

    /// Prefix-bucket delete scoped to this namespace.
    ///
    /// # Errors
    ///
    /// See [`Store::delete_by_prefix_bucket`].
    pub fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.store.delete_by_prefix_bucket(&self.id, key)
    }

    /// Removes every object in this namespace.
    ///
    /// # Errors
    ///
    /// See [`Store::delete_namespace`].
    pub fn purge(&self) -> Result<(), StorageError> {
        self.store.delete_namespace(&self.id)
    }
}
