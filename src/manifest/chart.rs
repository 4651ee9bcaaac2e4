//! Chart metadata (`Chart.yaml`) and the release metadata document some
//! charts carry under `templates/release.yaml`.
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{manifest, result::Result};

/// File name of the chart manifest.
pub const CHART_FILE: &str = "Chart.yaml";

/// The subset of `Chart.yaml` the promotion engine reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartMeta {
    pub name: String,
    pub version: String,
    pub description: String,
}

impl ChartMeta {
    /// Load `Chart.yaml` from a chart directory. Absence is valid and yields
    /// `None`.
    pub fn load(chart_dir: &Path) -> Result<Option<Self>> {
        let path = chart_dir.join(CHART_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let meta = manifest::read_yaml(&path)?;
        Ok(Some(meta))
    }
}

/// Release metadata carried by a chart under `templates/release.yaml`,
/// linking the packaged chart back to its source repository and notes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReleaseMeta {
    pub spec: ReleaseSpec,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReleaseSpec {
    pub git_http_url: String,
    pub release_notes_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_returns_none_without_chart_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ChartMeta::load(dir.path()).unwrap().is_none());
    }

    #[test]
    fn parses_chart_metadata() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CHART_FILE),
            "name: bar\nversion: 1.2.3\ndescription: An example chart\napiVersion: v2\n",
        )
        .unwrap();

        let meta = ChartMeta::load(dir.path()).unwrap().unwrap();
        assert_eq!(meta.name, "bar");
        assert_eq!(meta.version, "1.2.3");
        assert_eq!(meta.description, "An example chart");
    }

    #[test]
    fn parses_release_metadata() {
        let content = concat!(
            "apiVersion: apps.gitops-promote.dev/v1alpha1\n",
            "kind: Release\n",
            "spec:\n",
            "  gitHttpUrl: https://github.com/acme/bar\n",
            "  releaseNotesUrl: https://github.com/acme/bar/releases/tag/v1.2.3\n",
        );
        let release: ReleaseMeta = serde_yaml::from_str(content).unwrap();
        assert_eq!(release.spec.git_http_url, "https://github.com/acme/bar");
        assert!(release.spec.release_notes_url.ends_with("v1.2.3"));
    }
}
