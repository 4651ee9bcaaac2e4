//! Kpt overlay promotion strategy: updates matching packages with
//! `kpt pkg update`.
use log::*;
use std::path::{Path, PathBuf};

use crate::{
    exec::CommandRunner,
    forge::types::PullRequestDetails,
    pipeline,
    result::Result,
    rules::{PromotionStrategy, RuleContext},
};

#[derive(Debug, Default)]
pub struct KptStrategy;

struct KptUpdate<'a> {
    version: String,
    runner: &'a dyn CommandRunner,
}

impl pipeline::OverlayMutation for KptUpdate<'_> {
    fn apply(
        &self,
        packages: &[PathBuf],
        dir: &Path,
        details: &mut PullRequestDetails,
    ) -> Result<bool> {
        for rel in packages {
            let target = if self.version.is_empty() {
                rel.display().to_string()
            } else {
                format!("{}@{}", rel.display(), self.version)
            };
            let args = vec![
                "pkg".to_string(),
                "update".to_string(),
                target.clone(),
            ];
            self.runner.run(dir, "kpt", &args)?;
            info!("updated kpt package {target}");

            if !details.body.is_empty() && !details.body.ends_with('\n') {
                details.body.push('\n');
            }
            details
                .body
                .push_str(&format!("* updated kpt package `{}`", rel.display()));
        }
        Ok(true)
    }
}

impl PromotionStrategy for KptStrategy {
    fn apply(
        &self,
        ctx: &RuleContext,
        details: &mut PullRequestDetails,
    ) -> Result<()> {
        let rule = ctx.config.spec.kpt.clone().unwrap_or_default();
        let coords = ctx.env.chart_coordinates(
            &ctx.template.app_name,
            &ctx.template.helm_repository_url,
        )?;

        let mutation = KptUpdate {
            version: ctx.template.version.clone(),
            runner: ctx.runner,
        };
        match pipeline::modify_overlay(
            ctx.dir,
            &rule.path,
            &coords.local_name,
            &mutation,
            details,
        )? {
            Some(_) => {}
            None => info!(
                "no kpt packages named {} under {}",
                coords.local_name,
                ctx.dir.display()
            ),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        exec::MockCommandRunner,
        pipeline::KPT_FILE,
        renderer::MockChartRenderer,
        rules::config::{KptRule, PromoteConfig},
        test_helpers::{
            create_test_details, create_test_env_context, create_test_template,
        },
    };
    use std::fs;

    fn kpt_config(path: &str) -> PromoteConfig {
        let mut config = PromoteConfig::default();
        config.spec.kpt = Some(KptRule { path: path.to_string() });
        config
    }

    #[test]
    fn updates_each_matching_package() {
        let dir = tempfile::tempdir().unwrap();
        for overlay in ["staging", "production"] {
            let package = dir.path().join("overlays").join(overlay).join("bar");
            fs::create_dir_all(&package).unwrap();
            fs::write(package.join(KPT_FILE), "apiVersion: kpt.dev/v1\n")
                .unwrap();
        }

        let env = create_test_env_context();
        let renderer = MockChartRenderer::new();
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|_, program, args| {
                program == "kpt"
                    && args[0] == "pkg"
                    && args[1] == "update"
                    && args[2].ends_with("bar@1.2.3")
            })
            .times(2)
            .returning(|_, _, _| Ok(String::new()));

        let ctx = RuleContext {
            dir: dir.path(),
            config: kpt_config("overlays"),
            template: create_test_template("bar", "1.2.3"),
            env: &env,
            chart_dir: None,
            values_files: vec![],
            renderer: &renderer,
            runner: &runner,
        };
        let mut details = create_test_details("bar", "1.2.3");

        KptStrategy.apply(&ctx, &mut details).unwrap();
        assert!(details.body.contains("overlays/production/bar"));
        assert!(details.body.contains("overlays/staging/bar"));
    }

    #[test]
    fn no_matching_package_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let env = create_test_env_context();
        let renderer = MockChartRenderer::new();
        let mut runner = MockCommandRunner::new();
        runner.expect_run().times(0);

        let ctx = RuleContext {
            dir: dir.path(),
            config: kpt_config(""),
            template: create_test_template("bar", "1.2.3"),
            env: &env,
            chart_dir: None,
            values_files: vec![],
            renderer: &renderer,
            runner: &runner,
        };
        let mut details = create_test_details("bar", "1.2.3");

        KptStrategy.apply(&ctx, &mut details).unwrap();
        assert!(details.body.is_empty());
    }

    #[test]
    fn empty_version_updates_without_ref() {
        let dir = tempfile::tempdir().unwrap();
        let package = dir.path().join("bar");
        fs::create_dir_all(&package).unwrap();
        fs::write(package.join(KPT_FILE), "apiVersion: kpt.dev/v1\n").unwrap();

        let env = create_test_env_context();
        let renderer = MockChartRenderer::new();
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|_, _, args| args[2] == "bar")
            .times(1)
            .returning(|_, _, _| Ok(String::new()));

        let ctx = RuleContext {
            dir: dir.path(),
            config: kpt_config(""),
            template: create_test_template("bar", ""),
            env: &env,
            chart_dir: None,
            values_files: vec![],
            renderer: &renderer,
            runner: &runner,
        };
        let mut details = create_test_details("bar", "latest");

        KptStrategy.apply(&ctx, &mut details).unwrap();
    }
}
