//! Flat app-registry promotion strategy.
use log::*;
use std::path::Path;

use crate::{
    forge::types::PullRequestDetails,
    manifest::apps::{AppEntry, AppRegistry},
    pipeline::{self, AppMutation},
    result::Result,
    rules::{PromotionStrategy, RuleContext},
};

/// Upserts an application entry in the registry. Inserting keeps the
/// promotion's default pull request wording; upgrading rewrites it to name
/// the old and new versions.
#[derive(Debug, Default)]
pub struct AppsStrategy;

struct AppUpsert {
    name: String,
    version: String,
    namespace: String,
}

impl AppMutation for AppUpsert {
    fn apply(
        &self,
        registry: &mut AppRegistry,
        _dir: &Path,
        details: &mut PullRequestDetails,
    ) -> Result<bool> {
        if let Some(entry) = registry.find(&self.name) {
            if self.version.is_empty() || entry.version == self.version {
                info!(
                    "{} is already installed at version {}",
                    self.name, entry.version
                );
                return Ok(false);
            }
            let old = entry.version.clone();
            entry.version = self.version.clone();
            details.title = format!("Upgrade {} to {}", self.name, self.version);
            details.body =
                format!("Upgrade {} from {} to {}", self.name, old, self.version);
            return Ok(true);
        }

        registry.apps.push(AppEntry {
            name: self.name.clone(),
            version: self.version.clone(),
            namespace: self.namespace.clone(),
        });
        Ok(true)
    }
}

impl PromotionStrategy for AppsStrategy {
    fn apply(
        &self,
        ctx: &RuleContext,
        details: &mut PullRequestDetails,
    ) -> Result<()> {
        let rule = ctx.config.spec.apps.clone().unwrap_or_default();
        let coords = ctx.env.chart_coordinates(
            &ctx.template.app_name,
            &ctx.template.helm_repository_url,
        )?;

        let dir = if rule.path.is_empty() {
            ctx.dir.to_path_buf()
        } else {
            ctx.dir.join(&rule.path)
        };

        let mutation = AppUpsert {
            name: coords.name.clone(),
            version: ctx.template.version.clone(),
            namespace: ctx.namespace(&rule.namespace),
        };

        match pipeline::modify_app_registry(&dir, &mutation, details)? {
            Some(true) => info!(
                "promoted {} to version {} in app registry",
                coords.name, ctx.template.version
            ),
            Some(false) => {}
            None => info!(
                "no app registry found in {}, nothing to promote",
                dir.display()
            ),
        }
        Ok(())
    }
}
