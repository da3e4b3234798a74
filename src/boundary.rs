use std::fmt;

/// Non-fatal conditions met while tagging or collecting merge request data.
/// These are reported to the user, never silently dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No tag matches the configured prefix; versioning starts at 0.0.0
    NoPriorTag { pattern: String },
    /// The most recent tag already points at HEAD
    NoNewCommits {
        latest_tag: String,
        current_commit_hash: String,
    },
    /// Tag exists but cannot be parsed as a semantic version
    MalformedTag { tag: String },
    /// A merge request job had nothing to do
    Skipped { job: String, reason: String },
}

impl BoundaryWarning {
    pub fn skipped(job: impl Into<String>, reason: impl Into<String>) -> Self {
        BoundaryWarning::Skipped {
            job: job.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoPriorTag { pattern } => {
                write!(
                    f,
                    "No tag matching '{}' found, starting from 0.0.0",
                    pattern
                )
            }
            BoundaryWarning::NoNewCommits {
                latest_tag,
                current_commit_hash,
            } => {
                let short_hash = if current_commit_hash.len() > 7 {
                    &current_commit_hash[..7]
                } else {
                    current_commit_hash.as_str()
                };
                write!(
                    f,
                    "No new commits since tag '{}' (current: {})",
                    latest_tag, short_hash
                )
            }
            BoundaryWarning::MalformedTag { tag } => {
                write!(
                    f,
                    "Tag '{}' does not follow semantic versioning, skipping bump (see https://semver.org)",
                    tag
                )
            }
            BoundaryWarning::Skipped { job, reason } => {
                write!(f, "Skipping {}: {}", job, reason)
            }
        }
    }
}
