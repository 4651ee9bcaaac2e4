#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestDetails {
    pub branch_name: String,
    pub title: String,
    pub message: String,
    pub body: String,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestFilter {
    pub number: Option<u64>,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestRequest {
    pub base_repo: String,
    pub details: PullRequestDetails,
    pub filter: PullRequestFilter,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestHandle {
    pub number: u64,
    pub url: String,
}
