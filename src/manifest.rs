//! On-disk document formats consumed and produced during a promotion.
//!
//! Each submodule owns one YAML document family: the legacy dependency
//! manifest, the flat app registry, the helmfile document, chart and release
//! metadata, and the generic App resource. Load routines return `Option`
//! where absence of the file is a valid signal rather than an error.
use color_eyre::eyre::Context;
use serde::{Serialize, de::DeserializeOwned};
use std::{fs, path::Path};

use crate::result::Result;

pub mod apps;
pub mod chart;
pub mod dependencies;
pub mod helmfile;
pub mod resource;

/// A named chart repository entry as it appears inside app-registry and
/// helmfile documents. One alias maps to one URL within a document; the same
/// URL may carry several aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct RepositoryRef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// Parse a YAML file into `T`, tagging errors with the path.
pub(crate) fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    let value = serde_yaml::from_str(&content)
        .wrap_err_with(|| format!("failed to parse {}", path.display()))?;
    Ok(value)
}

/// Serialize `value` as YAML to the given path.
pub(crate) fn write_yaml<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_yaml::to_string(value)
        .wrap_err_with(|| format!("failed to serialize {}", path.display()))?;
    fs::write(path, content)
        .wrap_err_with(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
