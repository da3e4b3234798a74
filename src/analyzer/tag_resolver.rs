use log::{debug, info, warn};

use crate::domain::tag::{self, DescribedTag, TagState, DEFAULT_TAG};
use crate::error::{AutotagError, Result};
use crate::git::Repository;

/// Most recent tag reachable from HEAD, as reported by describe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseTag {
    /// Raw describe output, e.g. `v1.2.3-4-g1282be0`
    pub described: String,
    /// Tag name without the describe suffix, e.g. `v1.2.3`
    pub name: String,
    /// True when no tag matched and `0.0.0` stands in
    pub is_default: bool,
}

impl BaseTag {
    fn default_tag() -> Self {
        BaseTag {
            described: DEFAULT_TAG.to_string(),
            name: DEFAULT_TAG.to_string(),
            is_default: true,
        }
    }
}

/// Reads tag and commit state from the local repository
pub struct TagResolver<'a, R: Repository> {
    repo: &'a R,
    prefix: String,
}

impl<'a, R: Repository> TagResolver<'a, R> {
    pub fn new(repo: &'a R, prefix: impl Into<String>) -> Self {
        TagResolver {
            repo,
            prefix: prefix.into(),
        }
    }

    /// Find the most recent `prefix[0-9]*` tag, or `0.0.0` when there is none.
    pub fn resolve_base_tag(&self) -> Result<BaseTag> {
        let pattern = tag::describe_pattern(&self.prefix);
        match self.repo.describe(&pattern) {
            Ok(described) => {
                info!("Most recent tag reachable from HEAD: {}", described);
                let name = DescribedTag::parse(&described).tag;
                Ok(BaseTag {
                    described,
                    name,
                    is_default: false,
                })
            }
            Err(AutotagError::TagNotFound(_)) => {
                info!("No tags match '{}', defaulting to {}", pattern, DEFAULT_TAG);
                Ok(BaseTag::default_tag())
            }
            Err(e) => Err(e),
        }
    }

    pub fn classify(&self, base: &BaseTag) -> TagState {
        if base.is_default {
            return TagState::Pending;
        }
        tag::classify(&self.prefix, &base.described)
    }

    /// Whether a new tag is needed on top of `base`. The default tag always is.
    pub fn needs_bump(&self, base: &BaseTag) -> bool {
        match self.classify(base) {
            TagState::Pending => true,
            TagState::PointsAtHead => {
                info!("Tag {} already points at the latest commit", base.described);
                false
            }
            TagState::Malformed => {
                warn!(
                    "Tag {} does not follow semantic versioning, skipping bump",
                    base.name
                );
                false
            }
        }
    }

    /// First-parent commits since `base`, oldest first. Empty for the default tag.
    pub fn commits_since(&self, base: &BaseTag) -> Result<Vec<String>> {
        if base.is_default {
            return Ok(Vec::new());
        }

        let mut commits = self.repo.first_parent_log(&base.name)?;
        commits.reverse();
        debug!("Commits since {}: {:?}", base.name, commits);
        Ok(commits)
    }

    pub fn head_sha(&self) -> Result<String> {
        self.repo.head_short_sha()
    }
}
