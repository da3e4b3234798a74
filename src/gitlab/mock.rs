use super::{CreatedTag, MergeRequest, MergeRequestApi, MergeRequestCommit, TagRequest};
use crate::error::{AutotagError, Result};
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory GitLab for tests
///
/// Unknown commits answer with an empty merge request list, the same thing
/// GitLab returns for a commit pushed without a merge request.
#[derive(Default)]
pub struct MockGitLab {
    commit_mrs: HashMap<String, Vec<MergeRequest>>,
    merge_requests: HashMap<u64, MergeRequest>,
    mr_commits: HashMap<u64, Vec<MergeRequestCommit>>,
    failing_commits: Vec<String>,
    created_tags: Mutex<Vec<TagRequest>>,
    added_labels: Mutex<Vec<(u64, Vec<String>)>>,
}

impl MockGitLab {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the merge request a commit belongs to
    pub fn with_commit_mr(mut self, sha: impl Into<String>, mr: MergeRequest) -> Self {
        self.commit_mrs.entry(sha.into()).or_default().push(mr);
        self
    }

    /// Register a merge request reachable by iid
    pub fn with_merge_request(mut self, mr: MergeRequest) -> Self {
        self.merge_requests.insert(mr.iid, mr);
        self
    }

    /// Register the commits of a merge request
    pub fn with_mr_commits(mut self, iid: u64, commits: Vec<MergeRequestCommit>) -> Self {
        self.mr_commits.insert(iid, commits);
        self
    }

    /// Make lookups for `sha` fail as if the API were unreachable
    pub fn failing_for(mut self, sha: impl Into<String>) -> Self {
        self.failing_commits.push(sha.into());
        self
    }

    /// Tags created so far, in call order
    pub fn created_tags(&self) -> Vec<TagRequest> {
        self.created_tags
            .lock()
            .map(|tags| tags.clone())
            .unwrap_or_default()
    }

    /// Labels added so far, in call order
    pub fn added_labels(&self) -> Vec<(u64, Vec<String>)> {
        self.added_labels
            .lock()
            .map(|labels| labels.clone())
            .unwrap_or_default()
    }
}

impl MergeRequestApi for MockGitLab {
    fn commit_merge_requests(&self, sha: &str) -> Result<Vec<MergeRequest>> {
        if self.failing_commits.iter().any(|s| s == sha) {
            return Err(AutotagError::lookup(format!("connection refused for {sha}")));
        }
        Ok(self.commit_mrs.get(sha).cloned().unwrap_or_default())
    }

    fn merge_request(&self, iid: u64) -> Result<MergeRequest> {
        self.merge_requests
            .get(&iid)
            .cloned()
            .ok_or_else(|| AutotagError::lookup(format!("GitLab responded with status 404 for !{iid}")))
    }

    fn merge_request_commits(&self, iid: u64) -> Result<Vec<MergeRequestCommit>> {
        Ok(self.mr_commits.get(&iid).cloned().unwrap_or_default())
    }

    fn create_tag(&self, request: &TagRequest) -> Result<CreatedTag> {
        let mut tags = self
            .created_tags
            .lock()
            .map_err(|_| AutotagError::lookup("mock state poisoned"))?;
        if tags.iter().any(|t| t.tag_name == request.tag_name) {
            return Err(AutotagError::lookup(format!(
                "GitLab responded with status 400: Tag {} already exists",
                request.tag_name
            )));
        }
        tags.push(request.clone());

        Ok(CreatedTag {
            name: request.tag_name.clone(),
            message: request.message.clone(),
            target: Some(request.target.clone()),
        })
    }

    fn add_merge_request_labels(&self, iid: u64, labels: &[String]) -> Result<MergeRequest> {
        let mut mr = self.merge_request(iid)?;
        for label in labels {
            if !mr.labels.contains(label) {
                mr.labels.push(label.clone());
            }
        }
        self.added_labels
            .lock()
            .map_err(|_| AutotagError::lookup("mock state poisoned"))?
            .push((iid, labels.to_vec()));
        Ok(mr)
    }
}
