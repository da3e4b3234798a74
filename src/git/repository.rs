use crate::error::{AutotagError, Result};
use git2::{DescribeOptions, Oid, Repository as Git2Repo, Sort};
use log::debug;
use std::path::Path;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn short_sha(&self, oid: Oid) -> Result<String> {
        let short = self.repo.find_object(oid, None)?.short_id()?;
        short
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| AutotagError::Git(git2::Error::from_str("abbreviated id is not UTF-8")))
    }
}

impl super::Repository for Git2Repository {
    fn describe(&self, pattern: &str) -> Result<String> {
        let mut options = DescribeOptions::new();
        options.describe_tags().pattern(pattern);

        let describe = self.repo.describe(&options).map_err(|e| {
            debug!("git describe --tags --match '{}' failed: {}", pattern, e);
            AutotagError::tag_not_found(pattern)
        })?;

        Ok(describe.format(None)?)
    }

    fn first_parent_log(&self, since_tag: &str) -> Result<Vec<String>> {
        let tag_commit = self
            .repo
            .revparse_single(&format!("refs/tags/{}", since_tag))
            .map_err(|_| AutotagError::tag_not_found(since_tag))?
            .peel_to_commit()?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL)?;
        revwalk.simplify_first_parent()?;
        revwalk.push_head()?;
        revwalk.hide(tag_commit.id())?;

        let mut commits = Vec::new();
        for oid in revwalk {
            commits.push(self.short_sha(oid?)?);
        }

        debug!("{} first-parent commits since {}", commits.len(), since_tag);
        Ok(commits)
    }

    fn head_short_sha(&self) -> Result<String> {
        let head = self.repo.head()?.peel_to_commit()?;
        self.short_sha(head.id())
    }

    fn tags_by_creation(&self, pattern: Option<&str>) -> Result<Vec<String>> {
        let names = self.repo.tag_names(pattern)?;

        let mut tags: Vec<(i64, String)> = Vec::new();
        for name in names.iter().flatten() {
            let reference = self.repo.find_reference(&format!("refs/tags/{}", name))?;

            // Annotated tags carry their own date; lightweight ones use the commit's.
            let tagged_at = reference
                .peel_to_tag()
                .ok()
                .and_then(|tag| tag.tagger().map(|sig| sig.when().seconds()));
            let created = match tagged_at {
                Some(seconds) => seconds,
                None => reference.peel_to_commit()?.time().seconds(),
            };

            tags.push((created, name.to_string()));
        }

        tags.sort_by_key(|(created, _)| *created);
        Ok(tags.into_iter().map(|(_, name)| name).collect())
    }

    fn remotes(&self) -> Result<Vec<String>> {
        let names = self.repo.remotes()?;
        Ok(names.iter().flatten().map(str::to_string).collect())
    }

    fn fetch_tags(&self, remote: &str) -> Result<()> {
        let mut remote = self.repo.find_remote(remote).map_err(|e| {
            AutotagError::configuration(format!("Cannot find remote '{}': {}", remote, e))
        })?;

        remote.fetch(&["+refs/tags/*:refs/tags/*"], None, None)?;
        Ok(())
    }
}
