use crate::domain::version::VersionBump;

/// Merge request labels that select a bump severity.
///
/// A merge request carrying the major label bumps major; otherwise the minor
/// label bumps minor; anything else is a patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelPolicy {
    pub major: String,
    pub minor: String,
}

impl LabelPolicy {
    pub fn new(major: impl Into<String>, minor: impl Into<String>) -> Self {
        LabelPolicy {
            major: major.into(),
            minor: minor.into(),
        }
    }

    pub fn classify<S: AsRef<str>>(&self, labels: &[S]) -> VersionBump {
        let has = |wanted: &str| labels.iter().any(|label| label.as_ref() == wanted);

        if has(&self.major) {
            VersionBump::Major
        } else if has(&self.minor) {
            VersionBump::Minor
        } else {
            VersionBump::Patch
        }
    }
}

impl Default for LabelPolicy {
    fn default() -> Self {
        LabelPolicy::new("version::major", "version::minor")
    }
}
