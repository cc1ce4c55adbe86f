mod node;

pub use node::{LoggingSection, NetworkSection, NodeConfig, NodeConfigInner, StoreSection};

use config::{Config, Environment, File, Map};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::Path;
use tracing::info;

/// Prefix of environment overrides, e.g. `GGNET__STORE__ROOT`.
pub const ENV_PREFIX: &str = "GGNET";
const ENV_SEPARATOR: &str = "__";

#[ggnet_derive::ggnet_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads `T` from an optional file overlaid with `GGNET__`-prefixed environment variables.
///
/// Nested keys use a double underscore: `GGNET__NETWORK__LISTEN_ADDRESS` maps to
/// `network.listen_address`. The file format follows the extension (`.toml`, `.json`,
/// `.yaml`, ...).
/// Without a path only defaults and the environment apply.
///
/// # Errors
/// Returns [`ConfigError::Config`] if the given file is missing or unreadable, or if the
/// merged values do not fit `T`.
///
/// # Example
/// ```rust
/// use ggnet_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local.toml")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    load_config_with_env(path, None)
}

/// [`load_config`] with an explicit environment instead of the process one.
///
/// `env` holds raw variable names and values, e.g. `GGNET__STORE__ROOT`.
///
/// # Errors
/// Same as [`load_config`].
pub fn load_config_with_env<T>(
    path: Option<impl AsRef<Path>>,
    env: Option<Map<String, String>>,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let mut builder = Config::builder();

    if let Some(path) = path.as_ref().map(AsRef::as_ref) {
        info!(path = %path.display(), "Loading config file");
        builder = builder.add_source(File::from(path).required(true));
    }

    let config = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator(ENV_SEPARATOR)
                .try_parsing(true)
                .source(env),
        )
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
