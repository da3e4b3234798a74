//! GitLab REST API collaborator
//!
//! [MergeRequestApi] is the seam between the workflows and GitLab:
//!
//! - [client::GitLabClient]: blocking `reqwest` client, one attempt per call
//! - [mock::MockGitLab]: in-memory fixture for tests

pub mod client;
pub mod mock;

pub use client::GitLabClient;
pub use mock::MockGitLab;

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Merge request as returned by the GitLab API (only the fields we use)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRequest {
    pub iid: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub target_branch: String,
}

/// Commit belonging to a merge request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRequestCommit {
    pub id: String,
    #[serde(default)]
    pub short_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
}

/// Request to create an annotated tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRequest {
    pub tag_name: String,
    pub target: String,
    pub message: Option<String>,
}

/// Confirmation returned after creating a tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedTag {
    pub name: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
}

/// GitLab operations needed by the CI jobs.
///
/// Every failure (transport, non-success status, undecodable body) is
/// reported as [crate::error::AutotagError::Lookup]. Nothing is retried.
pub trait MergeRequestApi {
    /// Merge requests that contain a commit
    fn commit_merge_requests(&self, sha: &str) -> Result<Vec<MergeRequest>>;

    /// A single merge request by project-level iid
    fn merge_request(&self, iid: u64) -> Result<MergeRequest>;

    /// All commits of a merge request, across every result page
    fn merge_request_commits(&self, iid: u64) -> Result<Vec<MergeRequestCommit>>;

    /// Create a tag pointing at `request.target`
    fn create_tag(&self, request: &TagRequest) -> Result<CreatedTag>;

    /// Add labels to a merge request
    fn add_merge_request_labels(&self, iid: u64, labels: &[String]) -> Result<MergeRequest>;
}

/// Pick the merge request targeting `branch`, or the first one when no branch
/// is configured.
pub fn select_merge_request<'a>(
    merge_requests: &'a [MergeRequest],
    branch: Option<&str>,
) -> Option<&'a MergeRequest> {
    match branch {
        Some(branch) => merge_requests
            .iter()
            .find(|mr| mr.target_branch == branch),
        None => merge_requests.first(),
    }
}
