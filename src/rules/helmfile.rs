//! Helmfile-document promotion strategy.
//!
//! Upserts a release into the helmfile and, when the chart repository has no
//! alias registered in the document yet, allocates one so the release's
//! chart reference resolves.
use log::*;

use crate::{
    forge::types::PullRequestDetails,
    manifest::helmfile::{Helmfile, HelmfileRelease, HELMFILE_NAME},
    result::Result,
    rules::{PromotionStrategy, RuleContext},
};

/// Alias allocated for chart repositories the helmfile does not know yet.
pub const DEFAULT_REPOSITORY_PREFIX: &str = "apps";

#[derive(Debug, Default)]
pub struct HelmfileStrategy;

impl PromotionStrategy for HelmfileStrategy {
    fn apply(
        &self,
        ctx: &RuleContext,
        _details: &mut PullRequestDetails,
    ) -> Result<()> {
        let rule = ctx.config.spec.helmfile.clone().unwrap_or_default();
        let mut coords = ctx.env.chart_coordinates(
            &ctx.template.app_name,
            &ctx.template.helm_repository_url,
        )?;

        let path = if rule.path.is_empty() {
            ctx.dir.join(HELMFILE_NAME)
        } else {
            ctx.dir.join(&rule.path)
        };
        let mut doc = Helmfile::load_or_default(&path)?;

        let repository_count = doc.repositories.len();
        if !coords.repository.is_empty() {
            coords.default_prefix(&mut doc.repositories, DEFAULT_REPOSITORY_PREFIX);
        }

        let version = &ctx.template.version;
        let mut changed = doc.repositories.len() != repository_count;
        if let Some(release) = doc.find(&coords.local_name) {
            let mut release_changed = false;
            if release.chart != coords.name {
                release.chart = coords.name.clone();
                release_changed = true;
            }
            if !version.is_empty() && release.version != *version {
                release.version = version.clone();
                release_changed = true;
            }
            if release_changed {
                changed = true;
            } else {
                info!(
                    "{} is already installed at version {}",
                    coords.local_name, release.version
                );
            }
        } else {
            doc.releases.push(HelmfileRelease {
                name: coords.local_name.clone(),
                chart: coords.name.clone(),
                version: version.clone(),
                namespace: ctx.namespace(&rule.namespace),
            });
            changed = true;
        }

        if changed {
            doc.save(&path)?;
            info!(
                "promoted {} to version {} in {}",
                coords.local_name,
                version,
                path.display()
            );
        }
        Ok(())
    }
}
