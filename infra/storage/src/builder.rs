use crate::engine::{Store, StoreInner};
use crate::error::{StorageError, StorageErrorExt};
use crate::security::{Sanitizer, sanitize_lenient};
use crate::transform::{PathTransform, TransformKind};
use private::Sealed;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::info;

const STORAGE_SUFFIX: &str = "_storage";
const NETWORK_SUFFIX: &str = "_network";

struct StoreConfig {
    transform: Arc<dyn PathTransform>,
    sanitizer: Sanitizer,
    listen_address: String,
    create: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            transform: TransformKind::default().into_transform(),
            sanitizer: Sanitizer::default(),
            listen_address: String::new(),
            create: true,
        }
    }
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("transform", &self.transform.name())
            .field("sanitizer", &self.sanitizer)
            .field("listen_address", &self.listen_address)
            .field("create", &self.create)
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct NoRoot;
#[derive(Debug)]
pub struct WithRoot(PathBuf);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoRoot {}
impl Sealed for WithRoot {}

/// Fluent builder for [`Store`]. A root is required before [`StoreBuilder::build`] exists.
#[allow(private_bounds)]
#[derive(Debug, Default)]
pub struct StoreBuilder<S: Sealed = NoRoot> {
    state: S,
    config: StoreConfig,
}

#[allow(private_bounds)]
impl<S: Sealed> StoreBuilder<S> {
    /// Sets the key-to-location transform. Defaults to the identity transform.
    #[must_use = "Sets the path transform for the store"]
    pub fn transform(mut self, transform: impl PathTransform + 'static) -> Self {
        self.config.transform = Arc::new(transform);
        self
    }

    /// Selects one of the built-in transforms.
    #[must_use = "Sets the path transform for the store"]
    pub fn transform_kind(mut self, kind: TransformKind) -> Self {
        self.config.transform = kind.into_transform();
        self
    }

    #[must_use = "Sets the path sanitizer for the store"]
    pub const fn sanitizer(mut self, sanitizer: Sanitizer) -> Self {
        self.config.sanitizer = sanitizer;
        self
    }

    /// Address the surrounding network layer listens on. The store only keeps it.
    #[must_use = "Sets the listen address recorded by the store"]
    pub fn listen_address(mut self, address: impl Into<String>) -> Self {
        self.config.listen_address = address.into();
        self
    }

    #[must_use = "Sets whether the storage area is created on build"]
    pub const fn create(mut self, enable: bool) -> Self {
        self.config.create = enable;
        self
    }

    fn transition<N: Sealed>(self, state: N) -> StoreBuilder<N> {
        StoreBuilder { state, config: self.config }
    }
}

impl StoreBuilder<NoRoot> {
    #[must_use = "Creates a new store builder with default configuration"]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root. Its final component names the sibling `<name>_storage` and
    /// `<name>_network` areas.
    #[must_use = "Sets the root path for the store"]
    pub fn root(self, path: impl Into<PathBuf>) -> StoreBuilder<WithRoot> {
        self.transition(WithRoot(path.into()))
    }
}

impl StoreBuilder<WithRoot> {
    /// Validates the configuration and returns a ready [`Store`].
    ///
    /// Every named component of the root is sanitized (`:` becomes `_`); drive prefixes and
    /// the root directory are kept. The final component then names the storage area
    /// `<name>_storage` and the reserved network area `<name>_network`, both siblings of the
    /// root. Only the storage area is created.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Misconfigured`] if the root has no usable final component
    /// (empty, `.`, `..`, `/`). Returns [`StorageError::Io`] if the storage area cannot be
    /// created, or does not exist while `create(false)` is set.
    pub fn build(self) -> Result<Store, StorageError> {
        let (root, storage_dir, network_dir) = derive_areas(&self.state.0)?;
        let config = self.config;

        if config.create {
            std::fs::create_dir_all(&storage_dir).context(format!(
                "Failed to bootstrap storage area: {}",
                storage_dir.display()
            ))?;
            info!(
                path = %storage_dir.display(),
                transform = config.transform.name(),
                "Bootstrapped storage area"
            );
        } else if !storage_dir.is_dir() {
            return Err(StorageError::Io {
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
                context: Some(format!("Storage area missing: {}", storage_dir.display()).into()),
            });
        }

        Ok(Store {
            inner: Arc::new(StoreInner {
                root,
                storage_dir,
                network_dir,
                listen_address: config.listen_address,
                transform: config.transform,
                sanitizer: config.sanitizer,
            }),
        })
    }
}

fn derive_areas(root: &Path) -> Result<(PathBuf, PathBuf, PathBuf), StorageError> {
    let name = root.file_name().and_then(|n| n.to_str()).ok_or_else(|| {
        StorageError::Misconfigured {
            message: format!("'{}'", root.display()).into(),
            context: Some("Store root must end in a UTF-8 directory name".into()),
        }
    })?;
    let name = sanitize_lenient(name);

    let mut clean = PathBuf::new();
    for component in root.components() {
        match component {
            Component::Normal(part) => match part.to_str() {
                Some(part) => clean.push(sanitize_lenient(part).as_ref()),
                None => clean.push(part),
            },
            other => clean.push(other),
        }
    }

    Ok((
        clean.with_file_name(name.as_ref()),
        clean.with_file_name(format!("{name}{STORAGE_SUFFIX}")),
        clean.with_file_name(format!("{name}{NETWORK_SUFFIX}")),
    ))
}
