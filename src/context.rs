//! Environment context: the target environment's settings plus the version
//! stream, answering chart coordinate lookups for the rest of the engine.
use std::path::{Path, PathBuf};

use crate::{
    coordinates::ChartCoordinates,
    registry::{AppDefaults, VersionStream},
    result::Result,
};

/// Fallback chart repository when neither the caller nor the environment
/// names one.
pub const DEFAULT_CHART_REPOSITORY: &str = "http://chartmuseum:8080";

/// Namespace applications deploy into when neither the caller nor the
/// version stream names one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Settings describing the target environment repository.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentSettings {
    /// Git URL of the environment repository being promoted into.
    pub git_url: String,
    /// Default namespace applications deploy into.
    pub namespace: String,
    /// Chart repository the environment installs applications from.
    pub apps_repository: String,
}

/// The environment being promoted into, paired with the version stream used
/// to resolve chart coordinates and application defaults.
pub struct EnvContext {
    pub settings: EnvironmentSettings,
    pub version_stream: Box<dyn VersionStream>,
}

impl EnvContext {
    pub fn new(
        settings: EnvironmentSettings,
        version_stream: Box<dyn VersionStream>,
    ) -> Self {
        Self {
            settings,
            version_stream,
        }
    }

    /// Resolves a possibly-prefixed chart name and an optional repository
    /// URL into full [`ChartCoordinates`].
    ///
    /// A name like `stable/bar` is split into prefix and local name. The
    /// version stream's alias registry fills in the rest: a registered
    /// prefix supplies the repository URL (winning over a caller-supplied
    /// one), a known URL supplies the prefix. When the repository is still
    /// unknown the environment's apps repository applies, then
    /// [`DEFAULT_CHART_REPOSITORY`]. Repositories that are filesystem paths
    /// make the chart local: the name becomes the joined path and the
    /// repository empties out.
    pub fn chart_coordinates(
        &self,
        chart_name: &str,
        repository: &str,
    ) -> Result<ChartCoordinates> {
        let mut repo = repository.to_string();
        let (mut prefix, local_name) = match chart_name.split_once('/') {
            Some((p, l)) if !p.is_empty() => (p.to_string(), l.to_string()),
            _ => (String::new(), chart_name.to_string()),
        };

        // a registered prefix wins over the caller-supplied repository
        if !prefix.is_empty() {
            let prefixes = self.version_stream.repository_prefixes()?;
            if let Some(url) = prefixes.urls_for_prefix(&prefix).first() {
                repo = url.clone();
            }
        }

        if repo.is_empty() {
            repo = if self.settings.apps_repository.is_empty() {
                DEFAULT_CHART_REPOSITORY.to_string()
            } else {
                self.settings.apps_repository.clone()
            };
        }

        if prefix.is_empty() {
            let prefixes = self.version_stream.repository_prefixes()?;
            if let Some(found) = prefixes.prefix_for_url(&repo) {
                prefix = found.to_string();
            }
        }

        let mut name = chart_name.to_string();
        if !prefix.is_empty() && name == local_name {
            name = format!("{prefix}/{local_name}");
        }

        let mut coords = ChartCoordinates {
            name,
            prefix,
            local_name,
            repository: repo,
        };

        if coords.repository.starts_with('.') || coords.repository.starts_with('/')
        {
            let joined = Path::new(&coords.repository).join(&coords.local_name);
            coords.name = joined.display().to_string();
            coords.prefix = joined
                .parent()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            coords.repository = String::new();
        }

        Ok(coords)
    }

    /// Per-application defaults from the version stream.
    pub fn application_defaults(
        &self,
        chart_name: &str,
    ) -> Result<(AppDefaults, Vec<PathBuf>)> {
        self.version_stream.application_defaults(chart_name)
    }
}
