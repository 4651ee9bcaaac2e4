//! Flat app registry document (`apps.yml`).
//!
//! Lists the applications deployed into an environment together with the
//! chart repositories they resolve against. Absence of the file is the
//! signal that the environment does not use this representation.
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{
    manifest::{self, RepositoryRef},
    result::Result,
};

/// File names probed for the app registry, in order.
pub const APPS_FILE_NAMES: [&str; 2] = ["apps.yml", "apps.yaml"];

/// One deployed application entry, identified by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
}

/// The parsed app registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppRegistry {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repositories: Vec<RepositoryRef>,
    #[serde(default)]
    pub apps: Vec<AppEntry>,
}

impl AppRegistry {
    /// Load the registry from `dir`, probing the known file names. Returns
    /// `None` when no registry file exists.
    pub fn load(dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        for file_name in APPS_FILE_NAMES {
            let path = dir.join(file_name);
            if path.exists() {
                let registry = manifest::read_yaml(&path)?;
                return Ok(Some((registry, path)));
            }
        }
        Ok(None)
    }

    /// Serialize the registry back to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        manifest::write_yaml(path, self)
    }

    /// Find the app entry with the given name.
    pub fn find(&mut self, name: &str) -> Option<&mut AppEntry> {
        self.apps.iter_mut().find(|a| a.name == name)
    }
}
