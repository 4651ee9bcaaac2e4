//! Legacy dependency manifest (`requirements.yaml`).
//!
//! An ordered list of chart dependencies where `(name, alias)` identifies an
//! entry. The helm promotion rule upserts into this list.
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{manifest, result::Result};

/// File name of the dependency manifest inside its chart directory.
pub const DEPENDENCIES_FILE: &str = "requirements.yaml";

/// One chart dependency entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRequirement {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alias: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub repository: String,
}

/// The parsed dependency manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DependencyManifest {
    #[serde(default)]
    pub dependencies: Vec<DependencyRequirement>,
}

impl DependencyManifest {
    /// Load the manifest from `dir`, returning `None` when the directory has
    /// no dependency manifest at all.
    pub fn load(dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let path = dir.join(DEPENDENCIES_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let manifest = manifest::read_yaml(&path)?;
        Ok(Some((manifest, path)))
    }

    /// Serialize the manifest back to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        manifest::write_yaml(path, self)
    }

    /// Find the dependency identified by `(name, alias)`.
    pub fn find(
        &mut self,
        name: &str,
        alias: &str,
    ) -> Option<&mut DependencyRequirement> {
        self.dependencies
            .iter_mut()
            .find(|d| d.name == name && d.alias == alias)
    }
}
