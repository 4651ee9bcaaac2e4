//! Version-stream registry lookups.
//!
//! The version stream is a checked-out directory of team-wide defaults:
//! which alias a chart repository URL is known by, and per-application
//! defaults such as the target namespace and extra values files. Lookups go
//! through the [`VersionStream`] trait so the promotion engine never cares
//! whether the stream is a local checkout or something remote.
use log::*;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::{manifest, result::Result};

/// File listing repository prefixes inside the version stream.
pub const REPOSITORIES_FILE: &str = "repositories.yml";

/// Directory of per-application defaults inside the version stream.
pub const APPS_DIR: &str = "apps";

/// File carrying per-application defaults.
pub const DEFAULTS_FILE: &str = "defaults.yaml";

/// Values file names collected from an application's defaults directory, in
/// merge order.
pub const VALUES_FILE_NAMES: [&str; 2] = ["values.yaml", "values.yaml.gotmpl"];

/// One prefix entry: an alias and the URLs it is known to point at.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrefixEntry {
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub urls: Vec<String>,
}

/// Snapshot of the alias registry, answering lookups in both directions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepositoryPrefixes {
    #[serde(default)]
    pub repositories: Vec<PrefixEntry>,
}

impl RepositoryPrefixes {
    /// URLs registered for an alias, first entry wins for resolution.
    pub fn urls_for_prefix(&self, prefix: &str) -> &[String] {
        self.repositories
            .iter()
            .find(|e| e.prefix == prefix)
            .map(|e| e.urls.as_slice())
            .unwrap_or(&[])
    }

    /// Reverse lookup: the alias a URL is registered under, if any.
    pub fn prefix_for_url(&self, url: &str) -> Option<&str> {
        self.repositories
            .iter()
            .find(|e| e.urls.iter().any(|u| u == url))
            .map(|e| e.prefix.as_str())
    }
}

/// Per-application defaults held in the version stream.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppDefaults {
    pub namespace: Option<String>,
    pub phase: Option<String>,
}

/// Read access to the version stream.
#[cfg_attr(test, mockall::automock)]
pub trait VersionStream {
    /// The alias registry snapshot.
    fn repository_prefixes(&self) -> Result<RepositoryPrefixes>;

    /// Defaults and extra values files for one application, both optional.
    fn application_defaults(
        &self,
        chart_name: &str,
    ) -> Result<(AppDefaults, Vec<PathBuf>)>;
}

/// Version stream backed by a local directory checkout.
pub struct FileVersionStream {
    root: PathBuf,
}

impl FileVersionStream {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl VersionStream for FileVersionStream {
    fn repository_prefixes(&self) -> Result<RepositoryPrefixes> {
        let path = self.root.join(REPOSITORIES_FILE);
        if !path.exists() {
            debug!("no {} in version stream, using empty registry", path.display());
            return Ok(RepositoryPrefixes::default());
        }
        manifest::read_yaml(&path)
    }

    fn application_defaults(
        &self,
        chart_name: &str,
    ) -> Result<(AppDefaults, Vec<PathBuf>)> {
        let dir = self.root.join(APPS_DIR).join(chart_name);

        let defaults_path = dir.join(DEFAULTS_FILE);
        let defaults = if defaults_path.exists() {
            manifest::read_yaml(&defaults_path)?
        } else {
            AppDefaults::default()
        };

        let mut values_files = vec![];
        for name in VALUES_FILE_NAMES {
            let path = dir.join(name);
            if path.exists() {
                values_files.push(path);
            }
        }

        Ok((defaults, values_files))
    }
}
