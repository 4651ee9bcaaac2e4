//! Promotion strategies and their dispatch.
//!
//! Each submodule implements one way of recording a new application version
//! in the environment repository: the flat app registry, arbitrary text
//! files, the legacy dependency manifest, a helmfile document, or kpt
//! package overlays. [`config`] discovers which strategy a repository uses
//! and [`dispatch`] selects exactly one of them.
use std::path::{Path, PathBuf};

use crate::{
    context::EnvContext, exec::CommandRunner, forge::types::PullRequestDetails,
    renderer::ChartRenderer, result::Result,
};

pub mod apps;
pub mod config;
pub mod dispatch;
pub mod file;
pub mod helm;
pub mod helmfile;
pub mod kpt;

/// Values exposed to file-rule command templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    pub git_url: String,
    pub version: String,
    pub app_name: String,
    pub chart_alias: String,
    pub namespace: String,
    pub helm_repository_url: String,
}

impl TemplateContext {
    pub fn to_tera(&self) -> tera::Context {
        let mut context = tera::Context::new();
        context.insert("git_url", &self.git_url);
        context.insert("version", &self.version);
        context.insert("app_name", &self.app_name);
        context.insert("chart_alias", &self.chart_alias);
        context.insert("namespace", &self.namespace);
        context.insert("helm_repository_url", &self.helm_repository_url);
        context
    }
}

/// Everything a promotion strategy needs to mutate the cloned environment
/// repository.
pub struct RuleContext<'a> {
    /// Root of the cloned environment repository.
    pub dir: &'a Path,
    /// Discovered rule configuration.
    pub config: config::PromoteConfig,
    /// Values for command templates and version lookups.
    pub template: TemplateContext,
    /// Environment the promotion targets.
    pub env: &'a EnvContext,
    /// Unpacked chart source, when one is available.
    pub chart_dir: Option<PathBuf>,
    /// Values files for generated requirement directories.
    pub values_files: Vec<PathBuf>,
    pub renderer: &'a dyn ChartRenderer,
    pub runner: &'a dyn CommandRunner,
}

impl RuleContext<'_> {
    /// Namespace for the promoted release: a per-rule override wins over the
    /// promotion-wide namespace.
    pub fn namespace(&self, rule_namespace: &str) -> String {
        if rule_namespace.is_empty() {
            self.template.namespace.clone()
        } else {
            rule_namespace.to_string()
        }
    }
}

/// One way of recording a promotion in the environment repository.
pub trait PromotionStrategy {
    fn apply(
        &self,
        ctx: &RuleContext,
        details: &mut PullRequestDetails,
    ) -> Result<()>;
}
