use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use self::output::OutputConfig;
use self::twitter::TwitterConfig;

pub mod output;
pub mod twitter;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub twitter: TwitterConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let conf_contents = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read {}", path.as_ref().display()))?;
        Ok(toml::from_str(&conf_contents)?)
    }

    /// Read `path` if it exists, an empty config otherwise
    pub fn read_optional(path: impl AsRef<Path>) -> Result<Self> {
        if path.as_ref().exists() {
            Self::read(path)
        } else {
            Ok(Self::default())
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "TW Extractor")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
