//! Common test helper functions shared across test modules.
//!
//! This module provides reusable utilities for creating test fixtures,
//! reducing code duplication across different test suites.
use std::path::PathBuf;

use crate::{
    context::{EnvContext, EnvironmentSettings},
    forge::types::PullRequestDetails,
    registry::{AppDefaults, PrefixEntry, RepositoryPrefixes, VersionStream},
    result::Result,
    rules::TemplateContext,
};

/// Version stream with a fixed alias registry and no application defaults.
///
/// # Example
/// ```ignore
/// let stream = StaticVersionStream::default();
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticVersionStream {
    pub prefixes: Vec<PrefixEntry>,
    pub namespace: Option<String>,
    pub values_files: Vec<PathBuf>,
}

impl VersionStream for StaticVersionStream {
    fn repository_prefixes(&self) -> Result<RepositoryPrefixes> {
        Ok(RepositoryPrefixes {
            repositories: self.prefixes.clone(),
        })
    }

    fn application_defaults(
        &self,
        _chart_name: &str,
    ) -> Result<(AppDefaults, Vec<PathBuf>)> {
        Ok((
            AppDefaults {
                namespace: self.namespace.clone(),
                phase: None,
            },
            self.values_files.clone(),
        ))
    }
}

/// Creates a test EnvContext targeting a staging environment with one
/// registered chart repository alias.
///
/// # Example
/// ```ignore
/// let env = create_test_env_context();
/// ```
pub fn create_test_env_context() -> EnvContext {
    EnvContext::new(
        EnvironmentSettings {
            git_url: "https://github.com/acme/env-staging.git".to_string(),
            namespace: "staging".to_string(),
            apps_repository: "".to_string(),
        },
        Box::new(StaticVersionStream {
            prefixes: vec![PrefixEntry {
                prefix: "stable".to_string(),
                urls: vec!["https://charts.example.com".to_string()],
            }],
            namespace: None,
            values_files: vec![],
        }),
    )
}

/// Creates a test TemplateContext for promoting `app` to `version`.
///
/// # Example
/// ```ignore
/// let template = create_test_template("bar", "1.2.3");
/// ```
pub fn create_test_template(app: &str, version: &str) -> TemplateContext {
    TemplateContext {
        git_url: "https://github.com/acme/env-staging.git".to_string(),
        version: version.to_string(),
        app_name: app.to_string(),
        chart_alias: "".to_string(),
        namespace: "staging".to_string(),
        helm_repository_url: "".to_string(),
    }
}

/// Creates PullRequestDetails the way a promotion seeds them before any
/// strategy runs.
///
/// # Example
/// ```ignore
/// let details = create_test_details("bar", "1.2.3");
/// ```
pub fn create_test_details(app: &str, version: &str) -> PullRequestDetails {
    PullRequestDetails {
        branch_name: format!("promote-{app}-{version}"),
        title: format!("chore: {app} to {version}"),
        message: format!("chore: Promote {app} to version {version}"),
        body: String::new(),
        labels: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_env_context() {
        let env = create_test_env_context();
        assert_eq!(env.settings.namespace, "staging");
        let prefixes = env.version_stream.repository_prefixes().unwrap();
        assert_eq!(
            prefixes.prefix_for_url("https://charts.example.com"),
            Some("stable")
        );
    }

    #[test]
    fn test_create_test_template() {
        let template = create_test_template("bar", "1.2.3");
        assert_eq!(template.app_name, "bar");
        assert_eq!(template.version, "1.2.3");
        assert_eq!(template.namespace, "staging");
    }

    #[test]
    fn test_create_test_details() {
        let details = create_test_details("bar", "1.2.3");
        assert_eq!(details.branch_name, "promote-bar-1.2.3");
        assert_eq!(details.title, "chore: bar to 1.2.3");
        assert_eq!(details.message, "chore: Promote bar to version 1.2.3");
    }
}
