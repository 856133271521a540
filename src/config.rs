use std::{path::PathBuf, sync::OnceLock};

use config::{Config, Environment, File};
use thiserror::Error;

use crate::position::INITIAL_POSITION_FEN;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("The configuration has already been initialized")]
    ConfigAlreadyInitialized,

    #[error("Unable to read the configuration: {0}")]
    UnableToReadConfig(#[from] config::ConfigError),
}

/// Configuration for the engine
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct KestrelConfig {
    /// Depth used by the perft command when none is given
    pub perft_depth: u16,

    /// Position used by the perft and play commands when none is given
    pub start_fen: String,
}

static CONFIG: OnceLock<KestrelConfig> = OnceLock::new();

/// Get the configuration of the engine
pub fn get_config() -> &'static KestrelConfig {
    CONFIG.get().expect("The configuration should have been initialized")
}

/// Reads the configuration from the defaults, the optional file and the `KESTREL_*` environment variables, in
/// increasing order of precedence.
pub fn load(path: Option<PathBuf>) -> Result<KestrelConfig, ConfigError> {
    let mut builder = Config::builder()
        .set_default("perft_depth", 5)?
        .set_default("start_fen", INITIAL_POSITION_FEN)?;

    if let Some(path) = path {
        builder = builder.add_source(File::from(path));
    }

    let settings = builder.add_source(Environment::with_prefix("KESTREL")).build()?;
    Ok(settings.try_deserialize()?)
}

/// Initialize the configuration of the engine
pub fn initialize(path: Option<PathBuf>) -> Result<(), ConfigError> {
    let config = load(path)?;
    CONFIG.set(config).map_err(|_| ConfigError::ConfigAlreadyInitialized)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_load_defaults() {
        let config = load(None).unwrap();

        assert_eq!(config.perft_depth, 5);
        assert_eq!(config.start_fen, INITIAL_POSITION_FEN);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("kestrel-config-test-{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "perft_depth = 3").unwrap();
        drop(file);

        let config = load(Some(path.clone())).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.perft_depth, 3);
        assert_eq!(config.start_fen, INITIAL_POSITION_FEN);
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("kestrel-config-test-missing.toml");

        assert!(matches!(load(Some(path)), Err(ConfigError::UnableToReadConfig(_))));
    }
}
