//! Git operations against the environment repository.
//!
//! This module provides the source-control plumbing the promotion
//! orchestrator drives: cloning the environment repository, branching,
//! committing mutations, and pushing the promotion branch. It handles:
//!
//! - Repository cloning and authentication
//! - Branch creation and switching
//! - Working tree dirtiness checks and commit identity capture
//! - Pushing promotion branches to the remote
//!
//! # Authentication
//!
//! Authentication is handled through Git credentials using username/token
//! pairs. Tokens should have push permission on the environment repository.
use git2::RemoteCallbacks;
use log::*;
use secrecy::{ExposeSecret, SecretString};
use std::path::Path;
use url::Url;

use crate::result::Result;

/// Remote name promotion branches are pushed to.
pub const DEFAULT_REMOTE: &str = "origin";

/// Source-control operations the promotion orchestrator depends on.
#[cfg_attr(test, mockall::automock)]
pub trait GitClient {
    /// Clones `url` into `dir`.
    fn clone_repo(&self, url: &str, dir: &Path) -> Result<()>;

    /// Commit id of HEAD.
    fn latest_commit(&self, dir: &Path) -> Result<String>;

    /// Whether the working tree has any changes, untracked files included.
    fn has_changes(&self, dir: &Path) -> Result<bool>;

    /// Creates `branch` at the current HEAD, overwriting an existing branch
    /// of the same name.
    fn create_branch(&self, dir: &Path, branch: &str) -> Result<()>;

    /// Checks out `branch` and moves HEAD to it.
    fn switch_branch(&self, dir: &Path, branch: &str) -> Result<()>;

    /// Stages every change and commits with `message`.
    fn commit_all(&self, dir: &Path, message: &str) -> Result<()>;

    /// Force-pushes `branch` to the remote.
    fn push_branch(&self, dir: &Path, branch: &str) -> Result<()>;
}

/// Create Git authentication callbacks for username/token authentication.
///
/// The token is passed as plaintext, which is appropriate for HTTPS
/// connections where the transport layer provides encryption.
fn get_auth_callbacks<'r>(user: String, token: String) -> RemoteCallbacks<'r> {
    let mut callbacks = git2::RemoteCallbacks::new();
    callbacks.credentials(move |_url, _username, _allowed| {
        git2::Cred::userpass_plaintext(&user, &token)
    });
    callbacks
}

fn open(dir: &Path) -> Result<git2::Repository> {
    let repo = git2::Repository::open(dir)?;
    Ok(repo)
}

/// [`GitClient`] backed by libgit2.
pub struct Git2Client {
    user: String,
    token: SecretString,
}

impl Git2Client {
    pub fn new(user: String, token: SecretString) -> Self {
        Self { user, token }
    }

    fn callbacks<'r>(&self) -> RemoteCallbacks<'r> {
        get_auth_callbacks(
            self.user.clone(),
            self.token.expose_secret().to_string(),
        )
    }
}

impl GitClient for Git2Client {
    fn clone_repo(&self, url: &str, dir: &Path) -> Result<()> {
        info!("cloning {url} into {}", dir.display());
        let url = Url::parse(url)?;

        let mut fetch_options = git2::FetchOptions::new();
        fetch_options.remote_callbacks(self.callbacks());

        let mut builder = git2::build::RepoBuilder::new();
        builder.fetch_options(fetch_options).clone(url.as_str(), dir)?;
        Ok(())
    }

    fn latest_commit(&self, dir: &Path) -> Result<String> {
        let repo = open(dir)?;
        let commit = repo.head()?.peel_to_commit()?;
        Ok(commit.id().to_string())
    }

    fn has_changes(&self, dir: &Path) -> Result<bool> {
        let repo = open(dir)?;
        let mut options = git2::StatusOptions::new();
        options.include_untracked(true).recurse_untracked_dirs(true);
        let statuses = repo.statuses(Some(&mut options))?;
        Ok(!statuses.is_empty())
    }

    fn create_branch(&self, dir: &Path, branch: &str) -> Result<()> {
        info!("creating branch: {branch}");
        let repo = open(dir)?;
        let head = repo.head()?;
        let commit = head.peel_to_commit()?;
        repo.branch(branch, &commit, true)?;
        Ok(())
    }

    fn switch_branch(&self, dir: &Path, branch: &str) -> Result<()> {
        info!("switching to branch: {branch}");
        let repo = open(dir)?;
        let ref_name = format!("refs/heads/{}", branch);
        let target_obj = repo.revparse_single(&ref_name)?;
        repo.checkout_tree(&target_obj, None)?;
        repo.set_head(&ref_name)?;
        Ok(())
    }

    fn commit_all(&self, dir: &Path, message: &str) -> Result<()> {
        debug!("committing changes with msg: {message}");
        let repo = open(dir)?;

        let mut index = repo.index()?;
        index.add_all(["."], git2::IndexAddOption::DEFAULT, None)?;
        index.write()?;

        let config = repo.config()?.snapshot()?;
        let user = config.get_str("user.name")?;
        let email = config.get_str("user.email")?;
        debug!("using committer: user: {user}, email: {email}");

        let oid = index.write_tree()?;
        let tree = repo.find_tree(oid)?;
        let parent_commit = repo.head()?.peel_to_commit()?;
        let committer = git2::Signature::now(user, email)?;
        repo.commit(
            Some("HEAD"),
            &committer,
            &committer,
            message,
            &tree,
            &[&parent_commit],
        )?;
        Ok(())
    }

    fn push_branch(&self, dir: &Path, branch: &str) -> Result<()> {
        info!("pushing branch {branch}");
        let repo = open(dir)?;

        let mut push_opts = git2::PushOptions::default();
        push_opts.remote_callbacks(self.callbacks());

        let mut remote = repo.find_remote(DEFAULT_REMOTE)?;

        // + indicates "force" push
        let ref_spec = format!("+refs/heads/{branch}");
        remote.push(&[ref_spec], Some(&mut push_opts))?;

        Ok(())
    }
}
