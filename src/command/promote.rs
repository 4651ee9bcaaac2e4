//! Promotion command implementation.
use log::*;
use std::{path::Path, rc::Rc};

use crate::{
    cli, config,
    context::{DEFAULT_NAMESPACE, EnvContext, EnvironmentSettings},
    exec::ProcessRunner,
    forge::{
        local::LocalForge,
        traits::Forge,
        types::{PullRequestDetails, PullRequestFilter, PullRequestHandle},
    },
    orchestrator::PullRequestOrchestrator,
    registry::FileVersionStream,
    renderer::HelmCli,
    repo::{Git2Client, GitClient},
    result::Result,
    rules::{
        RuleContext, TemplateContext, config::PromoteConfig, dispatch::Rule,
    },
};

/// Outcome of one promotion run.
#[derive(Debug, Default)]
pub struct ReleaseInfo {
    /// The resolved pull request, absent when the environment was already
    /// up to date.
    pub pull_request: Option<PullRequestHandle>,
}

/// Execute promote command against the configured environment repository.
pub fn execute(args: &cli::Args, promote: &cli::PromoteArgs) -> Result<()> {
    let tool_config = config::Config::load(Path::new("."))?;

    let (user, token) = args.get_git_auth(&promote.env_repo)?;
    let git: Rc<dyn GitClient> = Rc::new(Git2Client::new(user, token));
    let forge: Rc<dyn Forge> = Rc::new(LocalForge);

    let info = run(promote, &tool_config, git, forge)?;

    match info.pull_request {
        Some(pr) => {
            info!("promotion pull request #{}: {}", pr.number, pr.url)
        }
        None => {
            info!("environment already up to date: no pull request needed")
        }
    }

    Ok(())
}

/// Run one promotion with the given collaborators.
pub fn run(
    promote: &cli::PromoteArgs,
    tool_config: &config::Config,
    git: Rc<dyn GitClient>,
    forge: Rc<dyn Forge>,
) -> Result<ReleaseInfo> {
    let version_name = if promote.version.is_empty() {
        "latest".to_string()
    } else {
        promote.version.clone()
    };

    let mut details = PullRequestDetails {
        branch_name: format!("promote-{}-{}", promote.app, version_name),
        title: format!("chore: {} to {}", promote.app, version_name),
        message: format!(
            "chore: Promote {} to version {}",
            promote.app, version_name
        ),
        body: String::new(),
        labels: vec![],
    };

    let mut labels = tool_config.labels.clone();
    labels.extend(promote.labels.iter().cloned());

    let filter = PullRequestFilter {
        number: promote.pull_request,
        labels: labels.clone(),
    };

    let apps_repository = if promote.apps_repository.is_empty() {
        tool_config.apps_repository.clone()
    } else {
        promote.apps_repository.clone()
    };

    let version_stream_dir = promote
        .version_stream_dir
        .clone()
        .or_else(|| tool_config.version_stream_dir.clone())
        .unwrap_or_default();

    let env = EnvContext::new(
        EnvironmentSettings {
            git_url: promote.env_repo.clone(),
            namespace: promote.namespace.clone(),
            apps_repository,
        },
        Box::new(FileVersionStream::new(version_stream_dir)),
    );

    let clone_dir = promote
        .clone_dir
        .clone()
        .or_else(|| tool_config.clone_dir.clone());

    let app = promote.app.clone();
    let version = promote.version.clone();
    let chart_alias = promote.chart_alias.clone();
    let helm_repository_url = promote.helm_repository_url.clone();
    let chart_dir = promote.chart_dir.clone();
    let git_url = promote.env_repo.clone();

    let mut builder = PullRequestOrchestrator::builder();
    builder
        .git(git)
        .forge(forge)
        .labels(labels)
        .auto_merge(tool_config.auto_merge && !promote.no_auto_merge)
        .function(move |dir, details| {
            let config = PromoteConfig::discover(dir)?;
            let coords =
                env.chart_coordinates(&app, &helm_repository_url)?;
            let (defaults, values_files) =
                env.application_defaults(&coords.name)?;

            let namespace = if !env.settings.namespace.is_empty() {
                env.settings.namespace.clone()
            } else if let Some(ns) = &defaults.namespace {
                ns.clone()
            } else {
                DEFAULT_NAMESPACE.to_string()
            };

            let renderer = HelmCli::new(Box::new(ProcessRunner));
            let runner = ProcessRunner;

            let ctx = RuleContext {
                dir,
                config,
                template: TemplateContext {
                    git_url: git_url.clone(),
                    version: version.clone(),
                    app_name: app.clone(),
                    chart_alias: chart_alias.clone(),
                    namespace,
                    helm_repository_url: helm_repository_url.clone(),
                },
                env: &env,
                chart_dir: chart_dir.clone(),
                values_files,
                renderer: &renderer,
                runner: &runner,
            };

            let rule = Rule::from_spec(&ctx.config.spec)?;
            info!("applying {:?} for {}", rule, coords.name);
            rule.apply(&ctx, details)
        });

    if let Some(dir) = clone_dir {
        builder.clone_dir(dir);
    }

    let orchestrator = builder.build()?;
    let pull_request =
        orchestrator.create(&promote.env_repo, &mut details, &filter)?;

    Ok(ReleaseInfo { pull_request })
}
