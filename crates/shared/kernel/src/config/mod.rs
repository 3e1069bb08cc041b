use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::info;

/// Failures while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config error ({context}): {source}")]
    Load {
        #[source]
        source: config::ConfigError,
        context: &'static str,
    },
}

/// A reusable configuration loader combining file-based settings with
/// environment overrides.
///
/// Layering:
/// 1. **Base file**: `server.toml` (or the given path).
/// 2. **Environment**: variables prefixed `BRIGADE__`, nested keys split on
///    double underscores (`BRIGADE__DATABASE__URL` → `database.url`). Vendor
///    tokens normally arrive this way.
///
/// # Errors
/// Returns [`ConfigError::Load`] when the file is missing, malformed, or does
/// not deserialize into `T`.
///
/// # Example
/// ```rust
/// use brigade_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path = path.map_or_else(|| PathBuf::from("server"), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(true))
        .add_source(
            Environment::with_prefix("BRIGADE")
                .separator("__")
                .convert_case(config::Case::Snake),
        );

    info!("Loading config from {}", effective_path.display());

    let config = builder
        .build()
        .map_err(|source| ConfigError::Load { source, context: "Failed to build config" })?
        .try_deserialize::<T>()
        .map_err(|source| ConfigError::Load { source, context: "Failed to deserialize config" })?;

    Ok(config)
}
