use crate::domain::version::is_semver;
use regex::Regex;
use std::sync::OnceLock;

/// Default base when no matching tag exists yet
pub const DEFAULT_TAG: &str = "0.0.0";

fn describe_suffix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(.+)-(\d+)-g([0-9a-f]{7,40})$").expect("valid describe regex")
    })
}

/// Output of `git describe --tags`, split into its parts.
///
/// Either a bare tag name (the tag points at HEAD) or `TAG-N-gSHA` when
/// N commits sit on top of the tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribedTag {
    pub tag: String,
    pub abbreviated_sha: Option<String>,
}

impl DescribedTag {
    pub fn parse(described: &str) -> Self {
        match describe_suffix_regex().captures(described) {
            Some(captures) => DescribedTag {
                tag: captures[1].to_string(),
                abbreviated_sha: Some(captures[3].to_string()),
            },
            None => DescribedTag {
                tag: described.to_string(),
                abbreviated_sha: None,
            },
        }
    }

    /// True when describe printed only the tag name, i.e. no commits since the tag.
    pub fn points_at_head(&self) -> bool {
        self.abbreviated_sha.is_none()
    }
}

/// Classification of the most recent reachable tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagState {
    /// Tag already points at HEAD
    PointsAtHead,
    /// Tag does not follow semver; never bumped
    Malformed,
    /// New commits exist on top of a valid tag
    Pending,
}

/// Remove a leading tag prefix (e.g. "v1.2.3" -> "1.2.3").
pub fn strip_prefix<'a>(prefix: &str, tag: &'a str) -> &'a str {
    if prefix.is_empty() {
        return tag;
    }
    tag.strip_prefix(prefix).unwrap_or(tag)
}

/// Glob handed to `git describe --match` for a given prefix
pub fn describe_pattern(prefix: &str) -> String {
    format!("{}[0-9]*", prefix)
}

/// Classify a described tag.
pub fn classify(prefix: &str, described: &str) -> TagState {
    let parsed = DescribedTag::parse(described);
    if parsed.points_at_head() {
        return TagState::PointsAtHead;
    }
    if !is_semver(strip_prefix(prefix, &parsed.tag)) {
        return TagState::Malformed;
    }
    TagState::Pending
}

/// Whether a described tag needs a new version on top of it.
pub fn needs_bump(prefix: &str, described: &str) -> bool {
    classify(prefix, described) == TagState::Pending
}
