//! Workflow orchestration for each CI job
//!
//! Every workflow takes the loaded [Config] plus its collaborators and keeps
//! CLI parsing out of the business logic, so tests can drive the whole job
//! with [crate::git::MockRepository] and [crate::gitlab::MockGitLab].
//!
//! Required settings are checked before any git or network call.

use log::{info, warn};
use serde_json::Value;
use std::fs::{self, File};

use crate::analyzer::{TagResolver, VersionCalculator};
use crate::artifact::{write_json, TagArtifact, TagStatus};
use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::tag::{self, TagState};
use crate::domain::version::parse_version;
use crate::error::Result;
use crate::git::Repository;
use crate::gitlab::{MergeRequest, MergeRequestApi, TagRequest};
use crate::release_notes::{self, test_report, Collected, MrInfo, TestReport};
use crate::ui;

pub const DEFAULT_MR_TEMPLATE_OUTPUT: &str = "mr_template.json";
pub const DEFAULT_MR_INFO_OUTPUT: &str = "mr_info.json";
pub const DEFAULT_TEST_REPORT_INPUT: &str = "test_report.json";
pub const DEFAULT_TEST_REPORT_OUTPUT: &str = "test_report.csv";

/// Arguments for the tag workflow
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagWorkflowArgs {
    /// Compute and report the tag without creating it
    pub dry_run: bool,

    /// Artifact path; falls back to `tagging.output`
    pub output: Option<String>,
}

/// Arguments for the release tags workflow
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseTagsArgs {
    pub previous: String,
    pub current: String,
    pub pattern: Option<String>,

    /// Where to fetch tags from before listing them
    pub fetch: Option<TagFetch>,

    pub output: Option<String>,
}

/// Remotes to fetch tags from
#[derive(Debug, Clone, PartialEq)]
pub enum TagFetch {
    AllRemotes,
    Remote(String),
}

/// Tag the latest commit with the next semantic version.
///
/// The returned artifact has status:
/// - `created` / `planned` when a tag was (or would be) created
/// - `up_to_date` when the latest tag already points at HEAD
/// - `malformed` when the latest tag is not a semantic version (no artifact is
///   written and the caller is expected to fail the job)
pub fn run_tag_workflow<R, A>(
    args: &TagWorkflowArgs,
    config: &Config,
    repo: &R,
    api: &A,
) -> Result<TagArtifact>
where
    R: Repository,
    A: MergeRequestApi,
{
    config.validate_gitlab()?;

    let prefix = config.tagging.prefix.as_str();
    let resolver = TagResolver::new(repo, prefix);
    let base = resolver.resolve_base_tag()?;

    if base.is_default {
        ui::display_boundary_warning(&BoundaryWarning::NoPriorTag {
            pattern: tag::describe_pattern(prefix),
        });
    }

    let artifact = match resolver.classify(&base) {
        TagState::PointsAtHead => {
            let head = resolver.head_sha()?;
            up_to_date(&base.name, &head)
        }
        TagState::Malformed => {
            ui::display_boundary_warning(&BoundaryWarning::MalformedTag {
                tag: base.name.clone(),
            });
            TagArtifact {
                status: TagStatus::Malformed,
                base_tag: base.name.clone(),
                tag: None,
                version: None,
                target: None,
                message: None,
            }
        }
        TagState::Pending => {
            let commits = resolver.commits_since(&base)?;
            if commits.is_empty() && !base.is_default {
                let head = resolver.head_sha()?;
                up_to_date(&base.name, &head)
            } else {
                ui::display_commit_range(&commits, &base.name);

                let current = parse_version(tag::strip_prefix(prefix, &base.name))?;
                let calculator = VersionCalculator::new(
                    api,
                    config.tagging.label_policy(),
                    config.tagging.target_branch.clone(),
                );
                let next = calculator.compute_next_version(&current, &commits)?;

                let target = match next.target {
                    Some(target) => target,
                    None => resolver.head_sha()?,
                };
                let tag_name = format!("{}{}", prefix, next.version);
                let old_tag = (!base.is_default).then_some(base.name.as_str());
                ui::display_proposed_tag(old_tag, &tag_name, &target);

                let status = if args.dry_run {
                    ui::display_status(&format!("Dry run: would create tag {}", tag_name));
                    TagStatus::Planned
                } else {
                    let created = api.create_tag(&TagRequest {
                        tag_name: tag_name.clone(),
                        target: target.clone(),
                        message: next.message.clone(),
                    })?;
                    ui::display_success(&format!("Created tag {} on {}", created.name, target));
                    TagStatus::Created
                };

                TagArtifact {
                    status,
                    base_tag: base.name.clone(),
                    tag: Some(tag_name),
                    version: Some(next.version.to_string()),
                    target: Some(target),
                    message: next.message,
                }
            }
        }
    };

    // A malformed base tag fails the job, so nothing is handed downstream.
    let output = args
        .output
        .as_ref()
        .or(config.tagging.output.as_ref())
        .filter(|_| artifact.status != TagStatus::Malformed);
    if let Some(path) = output {
        write_json(path, &artifact)?;
    }

    Ok(artifact)
}

fn up_to_date(base_tag: &str, head: &str) -> TagArtifact {
    ui::display_boundary_warning(&BoundaryWarning::NoNewCommits {
        latest_tag: base_tag.to_string(),
        current_commit_hash: head.to_string(),
    });
    TagArtifact {
        status: TagStatus::UpToDate,
        base_tag: base_tag.to_string(),
        tag: None,
        version: None,
        target: None,
        message: None,
    }
}

/// Extract the checkbox list of the pipeline's merge request description.
pub fn run_mr_template_workflow<A: MergeRequestApi>(
    output: Option<&str>,
    config: &Config,
    api: &A,
) -> Result<Collected<Value>> {
    config.validate_gitlab()?;
    let iid = config.merge_request_iid()?;
    let header = config.header_text()?;

    let collected =
        release_notes::collect_mr_template(api, iid, header, &config.merge_request.markers())?;

    if let Collected::Ready(template) = &collected {
        write_json(output.unwrap_or(DEFAULT_MR_TEMPLATE_OUTPUT), template)?;
        ui::display_success(&format!("Saved merge request !{} template", iid));
    }
    report_skip("merge request template", &collected);

    Ok(collected)
}

/// Collect impacted components and Jira ids for the pipeline commit.
pub fn run_mr_info_workflow<A: MergeRequestApi>(
    output: Option<&str>,
    config: &Config,
    api: &A,
) -> Result<Collected<MrInfo>> {
    config.validate_gitlab()?;
    let commit_sha = config.commit_sha()?;
    let target_branch = config.target_branch()?;
    let header = config.header_text()?;

    let collected = release_notes::collect_mr_info(
        api,
        commit_sha,
        target_branch,
        header,
        &config.merge_request.markers(),
    )?;

    if let Collected::Ready(info) = &collected {
        write_json(output.unwrap_or(DEFAULT_MR_INFO_OUTPUT), info)?;
        ui::display_success(&format!(
            "Saved merge request !{} info ({} Jira id(s))",
            info.mr_iid,
            info.jira_ids.len()
        ));
    }
    report_skip("merge request info", &collected);

    Ok(collected)
}

/// List the tags created between two release tags.
pub fn run_release_tags_workflow<R: Repository>(
    args: &ReleaseTagsArgs,
    repo: &R,
) -> Result<Collected<Vec<String>>> {
    let remotes = match &args.fetch {
        None => Vec::new(),
        Some(TagFetch::Remote(remote)) => vec![remote.clone()],
        Some(TagFetch::AllRemotes) => repo.remotes()?,
    };
    for remote in &remotes {
        ui::display_status(&format!("Fetching tags from {}...", remote));
        repo.fetch_tags(remote)?;
    }

    let tags = repo.tags_by_creation(args.pattern.as_deref())?;
    info!("{} tag(s) in creation order", tags.len());

    let collected = release_notes::tags_between(&tags, &args.previous, &args.current);

    if let Collected::Ready(between) = &collected {
        ui::display_tag_list(
            &format!("Tags between {} and {}:", args.previous, args.current),
            between,
        );
        if let Some(path) = args.output.as_deref() {
            write_json(path, between)?;
        }
    }
    report_skip("release tags", &collected);

    Ok(collected)
}

/// Flatten a pipeline test report (JSON) into one CSV row per test case.
pub fn run_test_report_workflow(
    input: Option<&str>,
    output: Option<&str>,
) -> Result<Collected<usize>> {
    let input = input.unwrap_or(DEFAULT_TEST_REPORT_INPUT);
    let output = output.unwrap_or(DEFAULT_TEST_REPORT_OUTPUT);

    let report: TestReport = serde_json::from_str(&fs::read_to_string(input)?)?;
    let rows = release_notes::flatten_test_report(&report);

    if rows.is_empty() {
        let collected = Collected::skipped(format!("{} has no test cases", input));
        report_skip("test report", &collected);
        return Ok(collected);
    }

    test_report::write_csv(&rows, File::create(output)?)?;
    info!("Wrote {} test case(s) to {}", rows.len(), output);
    ui::display_success(&format!(
        "Flattened {} test case(s) from {} suite(s)",
        rows.len(),
        report.test_suites.len()
    ));

    Ok(Collected::Ready(rows.len()))
}

/// Add the version label to the pipeline's merge request.
pub fn run_label_workflow<A: MergeRequestApi>(
    label: Option<&str>,
    config: &Config,
    api: &A,
) -> Result<Collected<MergeRequest>> {
    config.validate_gitlab()?;

    let Some(iid) = config.merge_request.iid else {
        let collected = Collected::skipped("the pipeline has no merge request");
        report_skip("labeling", &collected);
        return Ok(collected);
    };

    let label = label.unwrap_or(config.merge_request.version_label.as_str());
    let mr = api.add_merge_request_labels(iid, &[label.to_string()])?;
    ui::display_success(&format!("Labeled merge request !{} with {}", iid, label));

    Ok(Collected::Ready(mr))
}

fn report_skip<T>(job: &str, collected: &Collected<T>) {
    if let Collected::Skipped(reason) = collected {
        warn!("Skipping {}: {}", job, reason);
        ui::display_boundary_warning(&BoundaryWarning::skipped(job, reason.as_str()));
    }
}
