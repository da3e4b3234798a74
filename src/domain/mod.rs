//! Domain logic - pure business rules independent of git and GitLab

pub mod checklist;
pub mod jira;
pub mod labels;
pub mod tag;
pub mod version;

pub use checklist::{Checkbox, CheckboxState, ChecklistMarkers, ComponentImpact};
pub use labels::LabelPolicy;
pub use tag::{DescribedTag, TagState};
pub use version::{Version, VersionBump};
