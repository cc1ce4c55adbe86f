//! Kernel pieces shared by ggnet binaries.
//!
//! Keep this crate lightweight: it owns the node configuration model and the layered loader that
//! fills it from a file plus `GGNET__*` environment overrides.
//!
//! ```rust
//! use ggnet_kernel::config::{NodeConfig, load_config};
//!
//! let cfg: NodeConfig = load_config(None::<&str>).unwrap();
//! assert_eq!(cfg.network.listen_address, ":3000");
//! ```

pub mod config;
