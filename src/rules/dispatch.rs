//! Static dispatch rule enum over the five promotion strategies.

use crate::{
    error::PromoteError,
    forge::types::PullRequestDetails,
    result::Result,
    rules::{
        PromotionStrategy, RuleContext, apps::AppsStrategy,
        config::PromoteSpec, file::FileStrategy, helm::HelmStrategy,
        helmfile::HelmfileStrategy, kpt::KptStrategy,
    },
};

/// Promotion strategy selected from a rule configuration with static
/// dispatch.
///
/// Exactly one strategy payload must be populated in the configuration;
/// zero or several populated payloads are configuration errors, caught here
/// rather than at apply time.
pub enum Rule {
    /// App registry upsert
    Apps(AppsStrategy),
    /// Raw-file line surgery
    File(FileStrategy),
    /// Legacy dependency manifest upsert
    Helm(HelmStrategy),
    /// Helmfile release upsert
    Helmfile(HelmfileStrategy),
    /// Kpt package update
    Kpt(KptStrategy),
}

impl Rule {
    /// Select the strategy the configuration asks for.
    ///
    /// # Example
    /// ```ignore
    /// let rule = Rule::from_spec(&config.spec)?;
    /// ```
    pub fn from_spec(spec: &PromoteSpec) -> Result<Self> {
        let mut kinds = vec![];
        if spec.apps.is_some() {
            kinds.push("apps");
        }
        if spec.file.is_some() {
            kinds.push("file");
        }
        if spec.helm.is_some() {
            kinds.push("helm");
        }
        if spec.helmfile.is_some() {
            kinds.push("helmfile");
        }
        if spec.kpt.is_some() {
            kinds.push("kpt");
        }

        if kinds.is_empty() {
            return Err(PromoteError::NoRule.into());
        }
        if kinds.len() > 1 {
            return Err(PromoteError::multiple_rules(&kinds).into());
        }

        let rule = if spec.apps.is_some() {
            Rule::Apps(AppsStrategy)
        } else if spec.file.is_some() {
            Rule::File(FileStrategy)
        } else if spec.helm.is_some() {
            Rule::Helm(HelmStrategy)
        } else if spec.helmfile.is_some() {
            Rule::Helmfile(HelmfileStrategy)
        } else {
            Rule::Kpt(KptStrategy)
        };
        Ok(rule)
    }

    /// Apply the selected strategy with static dispatch.
    pub fn apply(
        &self,
        ctx: &RuleContext,
        details: &mut PullRequestDetails,
    ) -> Result<()> {
        match self {
            Rule::Apps(strategy) => strategy.apply(ctx, details),
            Rule::File(strategy) => strategy.apply(ctx, details),
            Rule::Helm(strategy) => strategy.apply(ctx, details),
            Rule::Helmfile(strategy) => strategy.apply(ctx, details),
            Rule::Kpt(strategy) => strategy.apply(ctx, details),
        }
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::Apps(_) => write!(f, "Rule::Apps"),
            Rule::File(_) => write!(f, "Rule::File"),
            Rule::Helm(_) => write!(f, "Rule::Helm"),
            Rule::Helmfile(_) => write!(f, "Rule::Helmfile"),
            Rule::Kpt(_) => write!(f, "Rule::Kpt"),
        }
    }
}
