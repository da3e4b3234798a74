//! Merge request metadata, tag ranges and test reports collected for release
//! notes
//!
//! Each collector returns [Collected::Skipped] with a human-readable reason
//! when there is simply nothing to report, and an error only when GitLab, git
//! or the filesystem could not be read.

pub mod mr_info;
pub mod mr_template;
pub mod tags;
pub mod test_report;

pub use mr_info::{collect_mr_info, MrInfo};
pub use mr_template::{collect_mr_template, template_json};
pub use tags::tags_between;
pub use test_report::{flatten_test_report, TestReport};

/// Either data ready to be written, or the reason there is none
#[derive(Debug, Clone, PartialEq)]
pub enum Collected<T> {
    Ready(T),
    Skipped(String),
}

impl<T> Collected<T> {
    pub fn skipped(reason: impl Into<String>) -> Self {
        Collected::Skipped(reason.into())
    }

    pub fn ready(self) -> Option<T> {
        match self {
            Collected::Ready(value) => Some(value),
            Collected::Skipped(_) => None,
        }
    }
}
