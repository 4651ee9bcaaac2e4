//! Promotion rule configuration and discovery.
//!
//! Environment repositories may carry an explicit `.promote.yaml` naming the
//! strategy to use. Repositories without one are probed for the config files
//! each strategy operates on, in a fixed order.
use log::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::{
    error::PromoteError,
    manifest::{
        self, apps::APPS_FILE_NAMES, dependencies::DEPENDENCIES_FILE,
        helmfile::HELMFILE_NAME,
    },
    pipeline::KPT_FILE,
    result::Result,
};

/// Explicit rule configuration file at the environment repository root.
pub const PROMOTE_CONFIG_FILE: &str = ".promote.yaml";

/// Parsed `.promote.yaml` document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PromoteConfig {
    pub api_version: String,
    pub kind: String,
    pub metadata: ConfigMeta,
    pub spec: PromoteSpec,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigMeta {
    pub name: String,
}

/// Strategy payloads. Exactly one must be populated; unknown keys are
/// rejected so payload typos surface as parse errors instead of silently
/// selecting the wrong strategy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct PromoteSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apps: Option<AppsRule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<FileRule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helm: Option<HelmRule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helmfile: Option<HelmfileRule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kpt: Option<KptRule>,
}

/// Flat app-registry strategy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct AppsRule {
    /// Subdirectory holding the registry file. Empty means the repository
    /// root.
    pub path: String,
    pub namespace: String,
}

/// Arbitrary text-file strategy driven by a command template.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct FileRule {
    /// File to modify, relative to the repository root.
    pub path: String,
    /// Lines starting with this prefix are replaced in place.
    pub line_prefix: String,
    /// When no line matches the prefix, insert after the last line matching
    /// one of these.
    pub insert_after: Vec<LineMatcher>,
    /// Template rendering the replacement line.
    pub command_template: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LineMatcher {
    pub prefix: String,
    pub regex: String,
}

/// Legacy dependency-manifest strategy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct HelmRule {
    /// Subdirectory holding the dependency manifest. Empty means the
    /// repository root.
    pub path: String,
}

/// Helmfile-document strategy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct HelmfileRule {
    /// Helmfile path relative to the repository root. Empty means
    /// `helmfile.yaml` at the root.
    pub path: String,
    pub namespace: String,
}

/// Kpt package-overlay strategy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct KptRule {
    /// Subdirectory to search for packages. Empty means the whole
    /// repository.
    pub path: String,
}

impl PromoteConfig {
    /// Loads `.promote.yaml` when present, otherwise infers the strategy
    /// from which config files the repository carries.
    pub fn discover(dir: &Path) -> Result<Self> {
        let explicit = dir.join(PROMOTE_CONFIG_FILE);
        if explicit.exists() {
            debug!("loading promote configuration from {}", explicit.display());
            return manifest::read_yaml(&explicit);
        }

        let mut config = Self::default();
        if dir.join(DEPENDENCIES_FILE).exists() {
            debug!("discovered dependency manifest, using helm rule");
            config.spec.helm = Some(HelmRule::default());
            return Ok(config);
        }
        for file_name in APPS_FILE_NAMES {
            if dir.join(file_name).exists() {
                debug!("discovered app registry, using apps rule");
                config.spec.apps = Some(AppsRule::default());
                return Ok(config);
            }
        }
        if dir.join(HELMFILE_NAME).exists() {
            debug!("discovered helmfile, using helmfile rule");
            config.spec.helmfile = Some(HelmfileRule::default());
            return Ok(config);
        }
        if has_kpt_packages(dir)? {
            debug!("discovered kpt packages, using kpt rule");
            config.spec.kpt = Some(KptRule::default());
            return Ok(config);
        }

        Err(PromoteError::invalid_config(format!(
            "could not detect a promotion rule for {}",
            dir.display()
        ))
        .into())
    }
}

fn has_kpt_packages(dir: &Path) -> Result<bool> {
    if dir.join(KPT_FILE).exists() {
        return Ok(true);
    }
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        if path.is_dir() && has_kpt_packages(&path)? {
            return Ok(true);
        }
    }
    Ok(false)
}
