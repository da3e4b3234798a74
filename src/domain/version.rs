use crate::error::{AutotagError, Result};
use regex::Regex;
use semver::{BuildMetadata, Prerelease};
use std::sync::OnceLock;

pub use semver::Version;

fn semver_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d+)\.(\d+)\.(\d+)(?:-(\S+?))?(?:\+(\S+))?$").expect("valid semver regex")
    })
}

/// Version bump type decision
///
/// Ordered so that the highest severity of a range can be taken with `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VersionBump {
    Patch,
    Minor,
    Major,
}

impl VersionBump {
    pub fn name(&self) -> &'static str {
        match self {
            VersionBump::Patch => "patch",
            VersionBump::Minor => "minor",
            VersionBump::Major => "major",
        }
    }
}

impl std::fmt::Display for VersionBump {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Check whether a tag (without prefix) follows `MAJOR.MINOR.PATCH[-PRE][+BUILD]`.
pub fn is_semver(tag: &str) -> bool {
    semver_regex().is_match(tag)
}

/// Parse a version from a tag with its prefix already removed.
///
/// Tags accepted by [`is_semver`] whose suffixes fall outside the stricter
/// semver.org identifier rules (leading zeros, underscores) keep their numeric
/// core and lose the offending suffix.
pub fn parse_version(tag: &str) -> Result<Version> {
    let captures = semver_regex()
        .captures(tag)
        .ok_or_else(|| AutotagError::malformed_tag(tag))?;

    if let Ok(version) = Version::parse(tag) {
        return Ok(version);
    }

    let number = |idx: usize| -> Result<u64> {
        captures[idx]
            .parse::<u64>()
            .map_err(|_| AutotagError::malformed_tag(tag))
    };

    let mut version = Version::new(number(1)?, number(2)?, number(3)?);
    if let Some(pre) = captures.get(4) {
        version.pre = Prerelease::new(pre.as_str()).unwrap_or(Prerelease::EMPTY);
    }
    if let Some(build) = captures.get(5) {
        version.build = BuildMetadata::new(build.as_str()).unwrap_or(BuildMetadata::EMPTY);
    }
    log::debug!("Parsed '{}' leniently as {}", tag, version);
    Ok(version)
}

/// Bumps a version according to the specified bump type.
///
/// - **Major**: major += 1, minor = 0, patch = 0
/// - **Minor**: minor += 1, patch = 0
/// - **Patch**: patch += 1
///
/// Pre-release and build metadata are always dropped. A component already at
/// `u64::MAX` cannot be incremented and yields [AutotagError::MalformedTag].
pub fn bump(version: &Version, bump_type: VersionBump) -> Result<Version> {
    let overflow = || AutotagError::malformed_tag(version.to_string());
    let next = match bump_type {
        VersionBump::Major => {
            Version::new(version.major.checked_add(1).ok_or_else(overflow)?, 0, 0)
        }
        VersionBump::Minor => Version::new(
            version.major,
            version.minor.checked_add(1).ok_or_else(overflow)?,
            0,
        ),
        VersionBump::Patch => Version::new(
            version.major,
            version.minor,
            version.patch.checked_add(1).ok_or_else(overflow)?,
        ),
    };
    Ok(next)
}
