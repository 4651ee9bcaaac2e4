//! Local forge implementation for offline development and testing.
use crate::{
    forge::{
        traits::Forge,
        types::{PullRequestHandle, PullRequestRequest},
    },
    result::Result,
};

/// Forge that only logs what it would do. Promotions stay entirely local:
/// mutations land in the working directory but no pull request is opened.
#[derive(Debug, Default)]
pub struct LocalForge;

impl Forge for LocalForge {
    fn create_or_update_pull_request(
        &self,
        req: PullRequestRequest,
    ) -> Result<PullRequestHandle> {
        if let Some(number) = req.filter.number {
            log::warn!(
                "local_mode: would update pull request {number}: req: {:#?}",
                req
            );
            return Ok(PullRequestHandle {
                number,
                url: "".into(),
            });
        }

        log::warn!("local_mode: would create pull request: req: {:#?}", req);
        Ok(PullRequestHandle {
            number: 0,
            url: "".into(),
        })
    }
}
