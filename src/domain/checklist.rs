//! Markdown checkbox lists in merge request descriptions
//!
//! Merge request templates carry a header line followed by a list of
//! checkboxes, e.g.
//!
//! ```text
//! Components impacted by this MR:
//! - [x] api
//! - [ ] web
//! ```
//!
//! Checked entries are "enabled" (the component is impacted), unchecked ones
//! are "disabled".

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckboxState {
    Enabled,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkbox {
    pub text: String,
    pub state: CheckboxState,
}

/// Markdown prefixes that open a checked and an unchecked entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistMarkers {
    pub enabled: String,
    pub disabled: String,
}

impl Default for ChecklistMarkers {
    fn default() -> Self {
        ChecklistMarkers {
            enabled: "- [x]".to_string(),
            disabled: "- [ ]".to_string(),
        }
    }
}

/// Components split by checkbox state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentImpact {
    pub impacted_components: Vec<String>,
    pub non_impacted_components: Vec<String>,
}

impl ComponentImpact {
    pub fn from_checklist(entries: &[Checkbox]) -> Self {
        let mut impact = ComponentImpact::default();
        for entry in entries {
            match entry.state {
                CheckboxState::Enabled => impact.impacted_components.push(entry.text.clone()),
                CheckboxState::Disabled => impact.non_impacted_components.push(entry.text.clone()),
            }
        }
        impact
    }
}

/// Parse the checkbox list that follows `header` in `description`.
///
/// Returns `None` when no line equals the header. Blank lines inside the list
/// are skipped; the first line that is neither blank nor a checkbox ends it.
pub fn checklist_after_header(
    description: &str,
    header: &str,
    markers: &ChecklistMarkers,
) -> Option<Vec<Checkbox>> {
    let mut lines = description.lines();
    lines.by_ref().find(|line| *line == header)?;

    let mut entries = Vec::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (rest, state) = if let Some(rest) = line.strip_prefix(markers.enabled.as_str()) {
            (rest, CheckboxState::Enabled)
        } else if let Some(rest) = line.strip_prefix(markers.disabled.as_str()) {
            (rest, CheckboxState::Disabled)
        } else {
            break;
        };

        entries.push(Checkbox {
            text: rest.trim().to_string(),
            state,
        });
    }

    Some(entries)
}
