use crate::error::{AutotagError, Result};
use crate::git::Repository;
use std::collections::HashMap;
use std::sync::Mutex;

/// Mock repository for testing without actual git operations
///
/// Commits are registered oldest first, as they would appear walking the
/// first-parent chain forward from the tag.
pub struct MockRepository {
    described: Option<String>,
    commits_since: HashMap<String, Vec<String>>,
    head: String,
    tags: Vec<String>,
    remotes: Vec<String>,
    fetched: Mutex<Vec<String>>,
}

impl MockRepository {
    /// Create a new mock repository with the given HEAD short SHA and no tags
    pub fn new(head: impl Into<String>) -> Self {
        MockRepository {
            described: None,
            commits_since: HashMap::new(),
            head: head.into(),
            tags: Vec::new(),
            remotes: Vec::new(),
            fetched: Mutex::new(Vec::new()),
        }
    }

    /// Set what `describe` returns for any pattern
    pub fn with_described(mut self, described: impl Into<String>) -> Self {
        self.described = Some(described.into());
        self
    }

    /// Register the commits made since `tag`, oldest first
    pub fn with_commits_since<I, S>(mut self, tag: impl Into<String>, commits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.commits_since
            .insert(tag.into(), commits.into_iter().map(Into::into).collect());
        self
    }

    /// Register a remote; fetching from unknown remotes fails
    pub fn with_remote(mut self, name: impl Into<String>) -> Self {
        self.remotes.push(name.into());
        self
    }

    /// Remotes fetched so far, in call order
    pub fn fetched(&self) -> Vec<String> {
        self.fetched
            .lock()
            .map(|remotes| remotes.clone())
            .unwrap_or_default()
    }

    /// Add a tag; tags are listed in insertion order
    pub fn add_tag(&mut self, name: impl Into<String>) {
        self.tags.push(name.into());
    }
}

impl Repository for MockRepository {
    fn describe(&self, pattern: &str) -> Result<String> {
        self.described
            .clone()
            .ok_or_else(|| AutotagError::tag_not_found(pattern))
    }

    fn first_parent_log(&self, since_tag: &str) -> Result<Vec<String>> {
        let mut commits = self
            .commits_since
            .get(since_tag)
            .cloned()
            .ok_or_else(|| AutotagError::tag_not_found(since_tag))?;
        commits.reverse();
        Ok(commits)
    }

    fn head_short_sha(&self) -> Result<String> {
        Ok(self.head.clone())
    }

    fn tags_by_creation(&self, pattern: Option<&str>) -> Result<Vec<String>> {
        let prefix = pattern.map(|p| p.trim_end_matches('*'));
        Ok(self
            .tags
            .iter()
            .filter(|tag| prefix.map_or(true, |p| tag.starts_with(p)))
            .cloned()
            .collect())
    }

    fn remotes(&self) -> Result<Vec<String>> {
        Ok(self.remotes.clone())
    }

    fn fetch_tags(&self, remote: &str) -> Result<()> {
        if !self.remotes.iter().any(|r| r == remote) {
            return Err(AutotagError::configuration(format!(
                "Cannot find remote '{}'",
                remote
            )));
        }
        self.fetched
            .lock()
            .map_err(|_| AutotagError::configuration("mock state poisoned"))?
            .push(remote.to_string());
        Ok(())
    }
}
