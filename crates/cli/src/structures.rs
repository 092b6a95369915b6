//! Hold data structures for use in the front end.

use displaydoc::Display;
use serde::Deserialize;
use thiserror::Error;
use mawa::commands::Settings;

#[derive(Debug, Display, Error)]
/// Different things that can go wrong when starting up.
pub enum InitError {
    #[displaydoc("failed to read config file: {0}")]
    /// Failed to read config file
    ConfigOpenFailed(#[from] std::io::Error),
    #[displaydoc("failed to deserialize config file: {0}")]
    /// Failed to deserialize config file
    ConfigDeserializeFailed(#[from] toml::de::Error)
}

/// The contents of a config file. Every key is optional.
#[derive(Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    #[serde(flatten)]
    pub settings: Settings
}
