//! Helmfile document (`helmfile.yaml`): repository aliases plus release
//! entries referencing charts by `alias/name`.
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{
    manifest::{self, RepositoryRef},
    result::Result,
};

/// Default helmfile location relative to the environment root.
pub const HELMFILE_NAME: &str = "helmfile.yaml";

/// One release entry in the helmfile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelmfileRelease {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub chart: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
}

/// The parsed helmfile document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Helmfile {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repositories: Vec<RepositoryRef>,
    #[serde(default)]
    pub releases: Vec<HelmfileRelease>,
}

impl Helmfile {
    /// Load the helmfile at `path`, falling back to an empty document when
    /// the file does not exist yet.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        manifest::read_yaml(path)
    }

    /// Serialize the document back to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        manifest::write_yaml(path, self)
    }

    /// Find the release with the given name.
    pub fn find(&mut self, name: &str) -> Option<&mut HelmfileRelease> {
        self.releases.iter_mut().find(|r| r.name == name)
    }
}
