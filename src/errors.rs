use jar_config::ConfigError;
use jar_core::CoreError;
use thiserror::Error;

/// Error type covering every failure the application layer can surface.
#[derive(Debug, Error)]
pub enum JarError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Fatal shell failures; per-command errors are reported and the shell keeps going.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Jar(#[from] JarError),
    #[error("Input error: {0}")]
    Input(String),
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Jar(JarError::Io(err))
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Jar(JarError::Config(err))
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        CliError::Input(err.to_string())
    }
}
