//! # CLI Argument Definitions
//!
//! Global flags override the matching configuration keys; subcommands act on the local store.

use clap::{Parser, Subcommand};
use ggnet_kernel::config::NodeConfig;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "ggnet")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Local node of the ggnet content-addressable object store")]
pub struct Cli {
    /// Configuration file (`.toml`, `.json`, `.yaml`). `GGNET__*` variables override it
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Store root; objects live in the sibling `<root>_storage` directory
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Key-to-path transform: `identity` or `cas`
    #[arg(long, global = true)]
    pub transform: Option<String>,

    /// Path sanitizer: `lenient` or `strict`
    #[arg(long, global = true)]
    pub sanitizer: Option<String>,

    /// Log level (`error`, `warn`, `info`, `debug`, `trace`, `off`)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: NodeCommand,
}

impl Cli {
    /// Applies the flags that were given on top of a loaded configuration.
    pub fn apply_overrides(&self, cfg: &mut NodeConfig) {
        if let Some(root) = &self.root {
            cfg.store.root.clone_from(root);
        }
        if let Some(transform) = &self.transform {
            cfg.store.transform.clone_from(transform);
        }
        if let Some(sanitizer) = &self.sanitizer {
            cfg.store.sanitizer.clone_from(sanitizer);
        }
        if let Some(level) = &self.log_level {
            cfg.logging.level.clone_from(level);
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum NodeCommand {
    /// Store an object from a file or stdin and print the bytes written
    Put {
        id: String,
        key: String,
        /// Read from this file instead of stdin
        file: Option<PathBuf>,
    },
    /// Stream an object to stdout or a file
    Get {
        id: String,
        key: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print `true` if the object exists, `false` otherwise
    Has { id: String, key: String },
    /// Delete the object's whole first-segment bucket
    Delete { id: String, key: String },
    /// Delete every object of a namespace
    DropNamespace { id: String },
    /// Wipe the storage area
    Clear {},
    /// Print the on-disk path an object maps to
    Path { id: String, key: String },
    /// Print a new hex encryption key, random or derived from a passphrase
    Keygen {
        #[arg(long)]
        passphrase: Option<String>,
        #[arg(long, default_value = "ggnet")]
        salt: String,
    },
    /// Encrypt a file or stdin into the `[IV][ciphertext]` stream format
    Encrypt {
        /// Hex-encoded 32-byte key
        #[arg(short, long)]
        key: String,
        input: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Decrypt a `[IV][ciphertext]` stream straight into the store
    PutEncrypted {
        id: String,
        key: String,
        /// Hex-encoded 32-byte key
        #[arg(long = "with-key")]
        with_key: String,
        /// Read from this file instead of stdin
        file: Option<PathBuf>,
    },
}

impl NodeCommand {
    /// Key tooling runs without opening a store.
    #[must_use]
    pub const fn needs_store(&self) -> bool {
        !matches!(self, Self::Keygen { .. } | Self::Encrypt { .. })
    }
}
