//! Chart rendering behind a trait seam. The engine renders charts to locate
//! deployable resources; the real implementation shells out to the helm CLI.
use std::path::Path;

use crate::{exec::CommandRunner, result::Result};

/// Renders a chart's templates into an output directory.
#[cfg_attr(test, mockall::automock)]
pub trait ChartRenderer {
    fn render(
        &self,
        chart_dir: &Path,
        release_name: &str,
        output_dir: &Path,
        value_overrides: &[String],
        extra_args: &[String],
    ) -> Result<()>;
}

/// Renderer that invokes `helm template` against a chart directory.
pub struct HelmCli {
    runner: Box<dyn CommandRunner>,
}

impl HelmCli {
    pub fn new(runner: Box<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

impl ChartRenderer for HelmCli {
    fn render(
        &self,
        chart_dir: &Path,
        release_name: &str,
        output_dir: &Path,
        value_overrides: &[String],
        extra_args: &[String],
    ) -> Result<()> {
        let mut args = vec![
            "template".to_string(),
            release_name.to_string(),
            ".".to_string(),
            "--output-dir".to_string(),
            output_dir.display().to_string(),
        ];
        for pair in value_overrides {
            args.push("--set".to_string());
            args.push(pair.clone());
        }
        args.extend(extra_args.iter().cloned());

        self.runner.run(chart_dir, "helm", &args)?;
        Ok(())
    }
}
