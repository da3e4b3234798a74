use log::{debug, info};
use serde::Serialize;

use super::Collected;
use crate::domain::checklist::{checklist_after_header, ChecklistMarkers, ComponentImpact};
use crate::domain::jira::unique_issue_keys;
use crate::error::Result;
use crate::gitlab::{select_merge_request, MergeRequestApi};

/// Release note facts for the merge request behind a pipeline commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MrInfo {
    pub mr_iid: u64,
    pub template: ComponentImpact,
    pub jira_ids: Vec<String>,
}

/// Collect the impacted components and Jira ids of the merge request that
/// brought `commit_sha` into `target_branch`.
pub fn collect_mr_info<A: MergeRequestApi>(
    api: &A,
    commit_sha: &str,
    target_branch: &str,
    header: &str,
    markers: &ChecklistMarkers,
) -> Result<Collected<MrInfo>> {
    let merge_requests = api.commit_merge_requests(commit_sha)?;
    debug!(
        "Commit {} belongs to {} merge request(s)",
        commit_sha,
        merge_requests.len()
    );

    let Some(mr) = select_merge_request(&merge_requests, Some(target_branch)) else {
        return Ok(Collected::skipped(format!(
            "no merge request targeting {} contains commit {}",
            target_branch, commit_sha
        )));
    };

    let description = mr.description.as_deref().unwrap_or_default();
    let entries = checklist_after_header(description, header, markers).unwrap_or_default();
    let template = ComponentImpact::from_checklist(&entries);
    if template.impacted_components.is_empty() {
        return Ok(Collected::skipped(format!(
            "merge request !{} marks no impacted component",
            mr.iid
        )));
    }

    let commits = api.merge_request_commits(mr.iid)?;
    let jira_ids = unique_issue_keys(commits.iter().map(|c| c.message.as_str()));
    if jira_ids.is_empty() {
        return Ok(Collected::skipped(format!(
            "no Jira issue referenced by the commits of !{}",
            mr.iid
        )));
    }

    info!(
        "Merge request !{}: {} impacted component(s), {} Jira id(s)",
        mr.iid,
        template.impacted_components.len(),
        jira_ids.len()
    );

    Ok(Collected::Ready(MrInfo {
        mr_iid: mr.iid,
        template,
        jira_ids,
    }))
}
