use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Everything a node reads at startup.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NodeConfigInner {
    pub store: StoreSection,
    pub network: NetworkSection,
    pub logging: LoggingSection,
}

/// Arc-wrapped so subsystems can hold a copy cheaply.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct NodeConfig {
    #[serde(flatten, default)]
    inner: Arc<NodeConfigInner>,
}

impl Deref for NodeConfig {
    type Target = NodeConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for NodeConfig {
    fn deref_mut(&mut self) -> &mut NodeConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Where and how objects are laid out on disk.
///
/// `transform` and `sanitizer` stay strings here; the store rejects unknown names when it is
/// built.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    pub root: PathBuf,
    pub transform: String,
    pub sanitizer: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkSection {
    pub listen_address: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    pub directory: Option<PathBuf>,
    pub json: bool,
}

// --- Default ---

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            root: PathBuf::from("ggnetwork"),
            transform: "identity".to_owned(),
            sanitizer: "lenient".to_owned(),
        }
    }
}

impl Default for NetworkSection {
    fn default() -> Self {
        Self { listen_address: ":3000".to_owned() }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self { level: "info".to_owned(), directory: None, json: false }
    }
}
