use log::{debug, info};

use crate::domain::version::{self, Version, VersionBump};
use crate::domain::LabelPolicy;
use crate::error::{AutotagError, Result};
use crate::gitlab::{select_merge_request, MergeRequestApi};

/// Result of folding a commit range into one version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextVersion {
    pub version: Version,
    /// Highest severity seen; `None` for an empty range
    pub bump: Option<VersionBump>,
    /// Title of the last commit's merge request
    pub message: Option<String>,
    /// Last commit of the range
    pub target: Option<String>,
}

/// Computes the next version from merge request labels
pub struct VersionCalculator<'a, A: MergeRequestApi> {
    api: &'a A,
    labels: LabelPolicy,
    target_branch: Option<String>,
}

impl<'a, A: MergeRequestApi> VersionCalculator<'a, A> {
    pub fn new(api: &'a A, labels: LabelPolicy, target_branch: Option<String>) -> Self {
        VersionCalculator {
            api,
            labels,
            target_branch,
        }
    }

    /// Severity and title of the merge request that brought in `sha`.
    pub fn classify_commit(&self, sha: &str) -> Result<(VersionBump, String)> {
        let merge_requests = self.api.commit_merge_requests(sha)?;
        let mr = select_merge_request(&merge_requests, self.target_branch.as_deref())
            .or_else(|| merge_requests.first())
            .ok_or_else(|| {
                AutotagError::lookup(format!("no merge request found for commit {}", sha))
            })?;

        let bump = self.labels.classify(mr.labels.as_slice());
        debug!(
            "{} -> !{} '{}' labels {:?} ({})",
            sha, mr.iid, mr.title, mr.labels, bump
        );
        Ok((bump, mr.title.clone()))
    }

    /// Apply the highest severity across `commits` (oldest first) to `base` once.
    ///
    /// Any lookup failure aborts the whole computation.
    pub fn compute_next_version(&self, base: &Version, commits: &[String]) -> Result<NextVersion> {
        let mut highest: Option<VersionBump> = None;
        let mut message = None;

        for sha in commits {
            let (bump, title) = self.classify_commit(sha)?;
            highest = highest.max(Some(bump));
            message = Some(title);
        }

        let next = match highest {
            Some(bump) => version::bump(base, bump)?,
            None => base.clone(),
        };

        if let Some(bump) = highest {
            info!(
                "{} commit(s) since {}, highest bump {} -> {}",
                commits.len(),
                base,
                bump,
                next
            );
        }

        Ok(NextVersion {
            version: next,
            bump: highest,
            message,
            target: commits.last().cloned(),
        })
    }
}
