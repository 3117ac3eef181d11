use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::Config;

/// Returns the config directory: `~/.config/stash/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".config").join("stash"))
}

/// Returns the config file path: `~/.config/stash/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Returns the persisted section state path: `~/.config/stash/sections.json`.
pub fn sections_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("sections.json"))
}

/// Tries to load and parse `config.toml`.
pub fn try_load() -> Result<Config, ConfigError> {
    let path = config_path().ok_or(ConfigError::NoHome)?;
    let content = read(&path)?;
    let mut config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    config.validate();
    Ok(config)
}

/// Loads the configuration from disk, falling back to defaults.
///
/// After loading, values are clamped to safe ranges via [`Config::validate`].
/// A missing file silently returns defaults; other errors are logged.
pub fn load() -> Config {
    match try_load() {
        Ok(config) => config,
        Err(e) if e.is_not_found() => Config::default(),
        Err(e) => {
            tracing::warn!("{e}");
            Config::default()
        }
    }
}

/// Reads persisted section state, if any.
///
/// Returns `None` when nothing has been saved yet; the caller then
/// starts from a fresh section set.
pub fn load_sections() -> Result<Option<Vec<u8>>, ConfigError> {
    let path = sections_path().ok_or(ConfigError::NoHome)?;
    match std::fs::read(&path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConfigError::Io {
            path: path.display().to_string(),
            source,
        }),
    }
}

/// Writes section state to `sections.json`, creating the directory.
pub fn save_sections(bytes: &[u8]) -> Result<(), ConfigError> {
    let path = sections_path().ok_or(ConfigError::NoHome)?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| io_error(dir, source))?;
    }
    std::fs::write(&path, bytes).map_err(|source| io_error(&path, source))
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| io_error(path, source))
}

fn io_error(path: &Path, source: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.display().to_string(),
        source,
    }
}
