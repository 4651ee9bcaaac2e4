//! Raw-file promotion strategy: line surgery on an arbitrary text file
//! driven by a rendered command template.
use color_eyre::eyre::WrapErr;
use log::*;
use regex::Regex;
use std::fs;
use tera::Tera;

use crate::{
    error::PromoteError,
    forge::types::PullRequestDetails,
    result::Result,
    rules::{config::LineMatcher, PromotionStrategy, RuleContext},
};

#[derive(Debug, Default)]
pub struct FileStrategy;

impl PromotionStrategy for FileStrategy {
    fn apply(
        &self,
        ctx: &RuleContext,
        details: &mut PullRequestDetails,
    ) -> Result<()> {
        let rule = ctx.config.spec.file.clone().unwrap_or_default();
        if rule.path.is_empty() {
            return Err(
                PromoteError::invalid_config("file rule requires a path").into()
            );
        }
        if rule.command_template.is_empty() {
            return Err(PromoteError::invalid_config(
                "file rule requires a commandTemplate",
            )
            .into());
        }

        let path = ctx.dir.join(&rule.path);
        let original = fs::read_to_string(&path)
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;

        let line = Tera::one_off(
            &rule.command_template,
            &ctx.template.to_tera(),
            false,
        )
        .wrap_err_with(|| {
            format!("failed to render command template for {}", path.display())
        })?;
        let line = line.trim_end().to_string();

        let matchers = compile_matchers(&rule.insert_after)?;
        let mut lines: Vec<String> =
            original.split('\n').map(str::to_string).collect();

        let mut replaced = false;
        if !rule.line_prefix.is_empty() {
            for existing in lines.iter_mut() {
                if existing.starts_with(&rule.line_prefix) {
                    *existing = line.clone();
                    replaced = true;
                    break;
                }
            }
        }
        if !replaced {
            let mut insert_at = None;
            for (i, existing) in lines.iter().enumerate() {
                if matchers.iter().any(|m| m.matches(existing)) {
                    insert_at = Some(i);
                }
            }
            match insert_at {
                Some(i) => lines.insert(i + 1, line.clone()),
                None => lines.push(line.clone()),
            }
        }

        let updated = lines.join("\n");
        if updated == original {
            info!("{} already contains `{}`", path.display(), line);
            return Ok(());
        }
        fs::write(&path, &updated)
            .wrap_err_with(|| format!("failed to write {}", path.display()))?;
        info!("updated {}", path.display());

        if !details.body.is_empty() && !details.body.ends_with('\n') {
            details.body.push('\n');
        }
        details.body.push_str(&format!("* updated `{}`", rule.path));
        Ok(())
    }
}

struct CompiledMatcher {
    prefix: String,
    regex: Option<Regex>,
}

impl CompiledMatcher {
    fn matches(&self, line: &str) -> bool {
        if !self.prefix.is_empty() && line.starts_with(&self.prefix) {
            return true;
        }
        self.regex.as_ref().is_some_and(|re| re.is_match(line))
    }
}

fn compile_matchers(matchers: &[LineMatcher]) -> Result<Vec<CompiledMatcher>> {
    matchers
        .iter()
        .map(|m| {
            let regex = if m.regex.is_empty() {
                None
            } else {
                Some(Regex::new(&m.regex).wrap_err_with(|| {
                    format!("invalid insertAfter regex {}", m.regex)
                })?)
            };
            Ok(CompiledMatcher { prefix: m.prefix.clone(), regex })
        })
        .collect()
}
