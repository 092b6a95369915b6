//! Finds and reads the configuration.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use dirs::config_dir;
use tracing::{info, warn};

use crate::structures::{Config, InitError};

/// The file name looked for in the platform config directory.
pub const CONFIG_FILE: &str = "mawa.toml";

/// Loads the configuration.
///
/// An explicit path must exist. Without one, `mawa.toml` in the platform config
/// directory is used if it's there, and defaults otherwise.
///
/// # Errors
/// Will return an error if the file can't be read or parsed. See [`InitError`].
pub fn load_config(explicit: Option<&Path>) -> Result<Config, InitError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_path() {
            Some(path) if path.exists() => path,
            path => {
                info!(?path, "no config file found, using defaults");
                return Ok(Config::default());
            }
        }
    };
    info!(?path, "reading config");
    let mut conf_file = File::open(&path)?;
    let mut raw_config = String::new();
    conf_file.read_to_string(&mut raw_config)?;
    parse_config(&raw_config)
}

/// Parses the text of a config file.
///
/// # Errors
/// Errors if the text isn't a valid config.
pub fn parse_config(raw: &str) -> Result<Config, InitError> {
    Ok(toml::from_str(raw)?)
}

fn default_path() -> Option<PathBuf> {
    let dir = config_dir();
    if dir.is_none() {
        warn!("no config directory found for this OS");
    }
    dir.map(|dir| dir.join(CONFIG_FILE))
}
