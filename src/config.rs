//! Configuration loading and parsing for `gitops-promote.toml` files.
//!
//! The file is optional; it seeds defaults that individual CLI flags can
//! override per invocation.
use color_eyre::eyre::WrapErr;
use log::*;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::result::Result;

/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "gitops-promote.toml";

/// Root configuration structure for `gitops-promote.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Chart repository applications install from when no other repository
    /// is resolved.
    pub apps_repository: String,
    /// Labels applied to every promotion pull request.
    pub labels: Vec<String>,
    /// Whether promotion pull requests carry the auto-merge label
    /// (default: true)
    pub auto_merge: bool,
    /// Directory promotions clone into; a temporary directory when unset.
    pub clone_dir: Option<PathBuf>,
    /// Local checkout of the version stream.
    pub version_stream_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            apps_repository: String::new(),
            labels: vec![],
            auto_merge: true,
            clone_dir: None,
            version_stream_dir: None,
        }
    }
}

impl Config {
    /// Load the configuration file from `dir`, using defaults when none
    /// exists.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(DEFAULT_CONFIG_FILE);
        if !path.exists() {
            info!("tool configuration not found: using default");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;
        let config = toml::from_str(&content)
            .wrap_err_with(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }
}
