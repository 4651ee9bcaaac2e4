//! Traits related to remote git forges
use crate::{
    forge::types::{PullRequestHandle, PullRequestRequest},
    result::Result,
};

#[cfg_attr(test, mockall::automock)]
pub trait Forge {
    /// Opens a new pull request, or pushes an update to the one named by the
    /// request's filter.
    fn create_or_update_pull_request(
        &self,
        req: PullRequestRequest,
    ) -> Result<PullRequestHandle>;
}
