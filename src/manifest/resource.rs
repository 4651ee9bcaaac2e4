//! Generic Kubernetes-style resource document, used to locate and annotate
//! the `App` resource inside rendered chart templates.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of the application resource.
pub const APP_KIND: &str = "App";

/// API group and version stamped on synthesized App resources.
pub const APP_API_VERSION: &str = "apps.gitops-promote.dev/v1alpha1";

/// Annotation carrying the chart description.
pub const ANNOTATION_APP_DESCRIPTION: &str =
    "gitops-promote.dev/app-description";

/// Annotation carrying the sanitized chart repository URL.
pub const ANNOTATION_APP_REPOSITORY: &str = "gitops-promote.dev/app-repository";

/// Label carrying the chart name.
pub const LABEL_APP_NAME: &str = "gitops-promote.dev/app-name";

/// Label carrying the chart version.
pub const LABEL_APP_VERSION: &str = "gitops-promote.dev/app-version";

/// Resource metadata: name plus the label/annotation maps the engine stamps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceMeta {
    pub name: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

/// A leniently-parsed resource document. Any YAML document can be read into
/// this shape; only `kind == "App"` documents are treated as candidates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppResource {
    pub api_version: String,
    pub kind: String,
    pub metadata: ResourceMeta,
    #[serde(skip_serializing_if = "serde_yaml::Value::is_null")]
    pub spec: serde_yaml::Value,
}

impl AppResource {
    /// Synthesize the default App resource for an application with no App
    /// template of its own.
    pub fn new_app(name: &str) -> Self {
        Self {
            api_version: APP_API_VERSION.into(),
            kind: APP_KIND.into(),
            metadata: ResourceMeta {
                name: name.into(),
                ..Default::default()
            },
            spec: serde_yaml::Value::Null,
        }
    }

    /// Whether this document is an App resource.
    pub fn is_app(&self) -> bool {
        self.kind == APP_KIND
    }
}
