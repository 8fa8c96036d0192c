//! Locates the on-disk home of the application and its config file.

use std::{env, fs, path::PathBuf};

use jar_config::{ConfigError, ConfigManager};

pub use jar_config::{ChartSettings, Config};

/// Overrides the base directory (used by tests and portable installs).
pub const HOME_ENV: &str = "JAR_BUDGET_HOME";
const DEFAULT_DIR_NAME: &str = ".jar_budget";

/// `$JAR_BUDGET_HOME`, or `~/.jar_budget`.
pub fn base_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV).filter(|value| !value.is_empty()) {
        return PathBuf::from(custom);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Config manager rooted at [`base_dir`], creating the directory on demand.
pub fn default_manager() -> Result<ConfigManager, ConfigError> {
    let base = base_dir();
    fs::create_dir_all(&base)?;
    ConfigManager::with_base_dir(base)
}

/// Loads the stored configuration, falling back to defaults when none exists.
pub fn load_or_default() -> Result<(ConfigManager, Config), ConfigError> {
    let manager = default_manager()?;
    let config = manager.load()?;
    tracing::debug!(path = %manager.config_path().display(), "configuration loaded");
    Ok((manager, config))
}
