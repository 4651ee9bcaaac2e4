//! Clone → mutate → diff-check → pull request, as one linear pass.
//!
//! The orchestrator owns no domain knowledge of its own: the mutation is an
//! injected change function, source control goes through [`GitClient`] and
//! the pull request through [`Forge`]. Its job is the ordering and the
//! idempotence guard: a mutation that leaves the working tree clean, or a
//! commit that does not move HEAD, resolves to no pull request at all.
use color_eyre::eyre::WrapErr;
use derive_builder::Builder;
use log::*;
use std::{
    path::{Path, PathBuf},
    rc::Rc,
};
use tempfile::TempDir;

use crate::{
    error::PromoteError,
    forge::{
        traits::Forge,
        types::{
            PullRequestDetails, PullRequestFilter, PullRequestHandle,
            PullRequestRequest,
        },
    },
    repo::GitClient,
    result::Result,
};

/// Label appended to promotion pull requests that should merge without
/// human review.
pub const AUTO_MERGE_LABEL: &str = "auto-merge";

/// Mutation applied to the cloned repository before committing.
pub type ChangeFunction =
    Rc<dyn Fn(&Path, &mut PullRequestDetails) -> Result<()>>;

#[derive(Builder)]
#[builder(setter(into), build_fn(private, name = "_build"))]
pub struct OrchestratorParams {
    pub git: Rc<dyn GitClient>,
    pub forge: Rc<dyn Forge>,
    /// Labels every promotion pull request carries.
    #[builder(default)]
    pub labels: Vec<String>,
    /// Whether to append [`AUTO_MERGE_LABEL`].
    #[builder(default = "true")]
    pub auto_merge: bool,
    /// Clone destination; a temporary directory when unset.
    #[builder(setter(into, strip_option), default)]
    pub clone_dir: Option<PathBuf>,
    #[builder(setter(custom), default)]
    pub function: Option<ChangeFunction>,
}

impl OrchestratorParamsBuilder {
    pub fn function<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&Path, &mut PullRequestDetails) -> Result<()> + 'static,
    {
        self.function = Some(Some(Rc::new(f)));
        self
    }

    pub fn build(&self) -> Result<PullRequestOrchestrator> {
        let params = self._build().map_err(|e| {
            PromoteError::invalid_config(format!(
                "Failed to build pull request orchestrator: {}",
                e
            ))
        })?;
        Ok(PullRequestOrchestrator::new(params))
    }
}

pub struct PullRequestOrchestrator {
    git: Rc<dyn GitClient>,
    forge: Rc<dyn Forge>,
    labels: Vec<String>,
    auto_merge: bool,
    clone_dir: Option<PathBuf>,
    function: Option<ChangeFunction>,
}

impl PullRequestOrchestrator {
    pub fn builder() -> OrchestratorParamsBuilder {
        OrchestratorParamsBuilder::default()
    }

    pub fn new(params: OrchestratorParams) -> Self {
        Self {
            git: params.git,
            forge: params.forge,
            labels: params.labels,
            auto_merge: params.auto_merge,
            clone_dir: params.clone_dir,
            function: params.function,
        }
    }

    /// Runs one promotion against `git_url` and resolves the pull request.
    ///
    /// Returns `Ok(None)` when the change function left the repository
    /// unchanged; the branch is neither pushed nor turned into a pull
    /// request in that case.
    pub fn create(
        &self,
        git_url: &str,
        details: &mut PullRequestDetails,
        filter: &PullRequestFilter,
    ) -> Result<Option<PullRequestHandle>> {
        let function = self
            .function
            .as_ref()
            .ok_or(PromoteError::MissingChangeFunction)?;

        // keep the temporary clone alive until the pull request resolves
        let scratch: TempDir;
        let dir = match &self.clone_dir {
            Some(dir) => dir.as_path(),
            None => {
                scratch = tempfile::tempdir()
                    .wrap_err("failed to create working directory")?;
                scratch.path()
            }
        };

        self.git.clone_repo(git_url, dir).wrap_err_with(|| {
            format!("failed to clone {} into {}", git_url, dir.display())
        })?;
        let before = self.git.latest_commit(dir)?;

        function(dir, details).wrap_err_with(|| {
            format!(
                "change function failed in {} for {}",
                dir.display(),
                git_url
            )
        })?;

        if !self.git.has_changes(dir)? {
            info!("no changes in {} for {}", dir.display(), git_url);
            return Ok(None);
        }

        self.git.create_branch(dir, &details.branch_name)?;
        self.git.switch_branch(dir, &details.branch_name)?;
        self.git.commit_all(dir, &details.message)?;

        let after = self.git.latest_commit(dir)?;
        if after == before {
            warn!(
                "commit in {} did not advance HEAD; skipping pull request",
                dir.display()
            );
            return Ok(None);
        }

        for label in &self.labels {
            if !details.labels.contains(label) {
                details.labels.push(label.clone());
            }
        }
        if self.auto_merge
            && !details.labels.iter().any(|l| l == AUTO_MERGE_LABEL)
        {
            details.labels.push(AUTO_MERGE_LABEL.to_string());
        }

        self.git.push_branch(dir, &details.branch_name)?;

        let handle =
            self.forge.create_or_update_pull_request(PullRequestRequest {
                base_repo: git_url.to_string(),
                details: details.clone(),
                filter: filter.clone(),
            })?;

        info!(
            "resolved pull request #{} for {}: {}",
            handle.number, git_url, handle.url
        );
        Ok(Some(handle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        forge::traits::MockForge, repo::MockGitClient,
        test_helpers::create_test_details,
    };

    const GIT_URL: &str = "https://github.com/acme/env-staging.git";

    fn happy_git() -> MockGitClient {
        let mut git = MockGitClient::new();
        git.expect_clone_repo().times(1).returning(|_, _| Ok(()));
        git.expect_latest_commit()
            .times(1)
            .returning(|_| Ok("aaa".to_string()));
        git.expect_latest_commit()
            .times(1)
            .returning(|_| Ok("bbb".to_string()));
        git.expect_has_changes().times(1).returning(|_| Ok(true));
        git.expect_create_branch().times(1).returning(|_, _| Ok(()));
        git.expect_switch_branch().times(1).returning(|_, _| Ok(()));
        git.expect_commit_all().times(1).returning(|_, _| Ok(()));
        git.expect_push_branch().times(1).returning(|_, _| Ok(()));
        git
    }

    #[test]
    fn opens_pull_request_when_tree_changed() {
        let mut forge = MockForge::new();
        forge
            .expect_create_or_update_pull_request()
            .withf(|req| {
                req.base_repo == GIT_URL
                    && req.details.body == "mutated"
                    && req.details.labels.contains(&"env/staging".to_string())
                    && req
                        .details
                        .labels
                        .contains(&AUTO_MERGE_LABEL.to_string())
                    && req.filter.number == Some(7)
            })
            .times(1)
            .returning(|req| {
                Ok(PullRequestHandle {
                    number: req.filter.number.unwrap_or_default(),
                    url: "https://example.com/pr/7".to_string(),
                })
            });

        let orchestrator = PullRequestOrchestrator::builder()
            .git(Rc::new(happy_git()) as Rc<dyn GitClient>)
            .forge(Rc::new(forge) as Rc<dyn Forge>)
            .labels(vec!["env/staging".to_string()])
            .function(|_, details| {
                details.body = "mutated".to_string();
                Ok(())
            })
            .build()
            .unwrap();

        let mut details = create_test_details("bar", "1.2.3");
        let filter = PullRequestFilter {
            number: Some(7),
            ..Default::default()
        };

        let handle = orchestrator
            .create(GIT_URL, &mut details, &filter)
            .unwrap()
            .unwrap();
        assert_eq!(handle.number, 7);
    }

    #[test]
    fn clean_tree_skips_commit_and_pull_request() {
        let mut git = MockGitClient::new();
        git.expect_clone_repo().times(1).returning(|_, _| Ok(()));
        git.expect_latest_commit()
            .times(1)
            .returning(|_| Ok("aaa".to_string()));
        git.expect_has_changes().times(1).returning(|_| Ok(false));
        git.expect_create_branch().times(0);
        git.expect_commit_all().times(0);
        git.expect_push_branch().times(0);

        let mut forge = MockForge::new();
        forge.expect_create_or_update_pull_request().times(0);

        let orchestrator = PullRequestOrchestrator::builder()
            .git(Rc::new(git) as Rc<dyn GitClient>)
            .forge(Rc::new(forge) as Rc<dyn Forge>)
            .function(|_, _| Ok(()))
            .build()
            .unwrap();

        let mut details = create_test_details("bar", "1.2.3");
        let result = orchestrator
            .create(GIT_URL, &mut details, &PullRequestFilter::default())
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn unmoved_head_skips_pull_request() {
        let mut git = MockGitClient::new();
        git.expect_clone_repo().times(1).returning(|_, _| Ok(()));
        git.expect_latest_commit()
            .times(2)
            .returning(|_| Ok("aaa".to_string()));
        git.expect_has_changes().times(1).returning(|_| Ok(true));
        git.expect_create_branch().times(1).returning(|_, _| Ok(()));
        git.expect_switch_branch().times(1).returning(|_, _| Ok(()));
        git.expect_commit_all().times(1).returning(|_, _| Ok(()));
        git.expect_push_branch().times(0);

        let mut forge = MockForge::new();
        forge.expect_create_or_update_pull_request().times(0);

        let orchestrator = PullRequestOrchestrator::builder()
            .git(Rc::new(git) as Rc<dyn GitClient>)
            .forge(Rc::new(forge) as Rc<dyn Forge>)
            .function(|_, _| Ok(()))
            .build()
            .unwrap();

        let mut details = create_test_details("bar", "1.2.3");
        let result = orchestrator
            .create(GIT_URL, &mut details, &PullRequestFilter::default())
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn auto_merge_opt_out_leaves_label_off() {
        let mut forge = MockForge::new();
        forge
            .expect_create_or_update_pull_request()
            .withf(|req| {
                !req.details
                    .labels
                    .contains(&AUTO_MERGE_LABEL.to_string())
            })
            .times(1)
            .returning(|_| Ok(PullRequestHandle::default()));

        let orchestrator = PullRequestOrchestrator::builder()
            .git(Rc::new(happy_git()) as Rc<dyn GitClient>)
            .forge(Rc::new(forge) as Rc<dyn Forge>)
            .auto_merge(false)
            .function(|_, _| Ok(()))
            .build()
            .unwrap();

        let mut details = create_test_details("bar", "1.2.3");
        orchestrator
            .create(GIT_URL, &mut details, &PullRequestFilter::default())
            .unwrap();
    }

    #[test]
    fn missing_change_function_is_fatal() {
        let git = MockGitClient::new();
        let forge = MockForge::new();

        let orchestrator = PullRequestOrchestrator::builder()
            .git(Rc::new(git) as Rc<dyn GitClient>)
            .forge(Rc::new(forge) as Rc<dyn Forge>)
            .build()
            .unwrap();

        let mut details = create_test_details("bar", "1.2.3");
        let err = orchestrator
            .create(GIT_URL, &mut details, &PullRequestFilter::default())
            .unwrap_err();
        assert!(err.to_string().contains("No change function configured"));
    }
}
