//! Legacy dependency-manifest promotion strategy.
//!
//! Upserts the chart into `requirements.yaml` and materializes a full
//! requirement directory next to it whenever the entry was inserted or its
//! version changed.
use log::*;
use std::path::Path;

use crate::{
    forge::types::PullRequestDetails,
    manifest::dependencies::{DependencyManifest, DependencyRequirement},
    pipeline::{self, DependencyMutation},
    renderer::ChartRenderer,
    requirement::{Requirement, RequirementBuilder},
    result::Result,
    rules::{PromotionStrategy, RuleContext},
};

#[derive(Debug, Default)]
pub struct HelmStrategy;

struct DependencyUpsert<'a> {
    alias: String,
    requirement: Requirement,
    renderer: &'a dyn ChartRenderer,
}

impl DependencyMutation for DependencyUpsert<'_> {
    fn apply(
        &self,
        manifest: &mut DependencyManifest,
        dir: &Path,
        _details: &mut PullRequestDetails,
    ) -> Result<bool> {
        let req = &self.requirement;

        if let Some(entry) = manifest.find(&req.name, &self.alias) {
            if req.version.is_empty() || entry.version == req.version {
                info!(
                    "{} is already installed at version {}",
                    req.name, entry.version
                );
                return Ok(false);
            }
            entry.version = req.version.clone();
        } else {
            manifest.dependencies.push(DependencyRequirement {
                name: req.name.clone(),
                alias: self.alias.clone(),
                version: req.version.clone(),
                repository: req.repository.clone(),
            });
        }

        RequirementBuilder::new(self.renderer).build(dir, req)?;
        Ok(true)
    }
}

impl PromotionStrategy for HelmStrategy {
    fn apply(
        &self,
        ctx: &RuleContext,
        details: &mut PullRequestDetails,
    ) -> Result<()> {
        let rule = ctx.config.spec.helm.clone().unwrap_or_default();
        let coords = ctx.env.chart_coordinates(
            &ctx.template.app_name,
            &ctx.template.helm_repository_url,
        )?;

        let dir = if rule.path.is_empty() {
            ctx.dir.to_path_buf()
        } else {
            ctx.dir.join(&rule.path)
        };

        let mutation = DependencyUpsert {
            alias: ctx.template.chart_alias.clone(),
            requirement: Requirement {
                name: coords.local_name.clone(),
                version: ctx.template.version.clone(),
                repository: coords.repository.clone(),
                chart_dir: ctx.chart_dir.clone(),
                values_files: ctx.values_files.clone(),
            },
            renderer: ctx.renderer,
        };

        match pipeline::modify_dependency_manifest(&dir, &mutation, details)? {
            Some(true) => info!(
                "promoted {} to version {} in dependency manifest",
                coords.local_name, ctx.template.version
            ),
            Some(false) => {}
            None => info!(
                "no dependency manifest found in {}, nothing to promote",
                dir.display()
            ),
        }
        Ok(())
    }
}
