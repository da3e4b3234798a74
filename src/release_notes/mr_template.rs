use log::info;
use serde_json::{json, Map, Value};

use super::Collected;
use crate::domain::checklist::{checklist_after_header, Checkbox, ChecklistMarkers};
use crate::error::Result;
use crate::gitlab::MergeRequestApi;

/// `{"<header>": [{"<text>": "enabled"}, ...]}`
pub fn template_json(header: &str, entries: &[Checkbox]) -> Value {
    let items: Vec<Value> = entries
        .iter()
        .map(|entry| {
            let mut item = Map::new();
            item.insert(entry.text.clone(), json!(entry.state));
            Value::Object(item)
        })
        .collect();

    let mut root = Map::new();
    root.insert(header.to_string(), Value::Array(items));
    Value::Object(root)
}

/// Read the checkbox list under `header` from merge request `iid`.
pub fn collect_mr_template<A: MergeRequestApi>(
    api: &A,
    iid: u64,
    header: &str,
    markers: &ChecklistMarkers,
) -> Result<Collected<Value>> {
    let mr = api.merge_request(iid)?;

    let description = match mr.description.as_deref() {
        Some(text) if !text.trim().is_empty() => text,
        _ => return Ok(Collected::skipped(format!("merge request !{} has no description", iid))),
    };

    let Some(entries) = checklist_after_header(description, header, markers) else {
        return Ok(Collected::skipped(format!(
            "merge request template does not contain the header text '{}'",
            header
        )));
    };

    if entries.is_empty() {
        return Ok(Collected::skipped(format!(
            "no checkboxes found under '{}'",
            header
        )));
    }

    info!("Found {} checkbox(es) under '{}'", entries.len(), header);
    Ok(Collected::Ready(template_json(header, &entries)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CheckboxState;
    use crate::gitlab::{MergeRequest, MockGitLab};

    const HEADER: &str = "Components impacted by this MR:";

    fn mr_with(description: Option<&str>) -> MergeRequest {
        MergeRequest {
            iid: 13,
            title: "Add export".to_string(),
            description: description.map(str::to_string),
            labels: vec![],
            target_branch: "main".to_string(),
        }
    }

    #[test]
    fn test_template_json_shape() {
        let entries = vec![
            Checkbox {
                text: "api".to_string(),
                state: CheckboxState::Enabled,
            },
            Checkbox {
                text: "web".to_string(),
                state: CheckboxState::Disabled,
            },
        ];
        let value = template_json(HEADER, &entries);
        assert_eq!(value.as_object().unwrap().len(), 1);
        assert_eq!(value[HEADER], json!([{"api": "enabled"}, {"web": "disabled"}]));
    }

    #[test]
    fn test_collect_mr_template() {
        let description = format!("Intro\n{}\n- [x] api\n- [ ] web\n", HEADER);
        let api = MockGitLab::new().with_merge_request(mr_with(Some(&description)));

        let collected =
            collect_mr_template(&api, 13, HEADER, &ChecklistMarkers::default()).unwrap();
        let value = collected.ready().unwrap();
        assert_eq!(value[HEADER], json!([{"api": "enabled"}, {"web": "disabled"}]));
    }

    #[test]
    fn test_empty_description_is_skipped() {
        let api = MockGitLab::new().with_merge_request(mr_with(None));
        let collected =
            collect_mr_template(&api, 13, HEADER, &ChecklistMarkers::default()).unwrap();
        assert!(matches!(collected, Collected::Skipped(_)));
    }

    #[test]
    fn test_missing_header_is_skipped() {
        let api = MockGitLab::new().with_merge_request(mr_with(Some("- [x] api")));
        let collected =
            collect_mr_template(&api, 13, HEADER, &ChecklistMarkers::default()).unwrap();
        assert!(matches!(collected, Collected::Skipped(reason) if reason.contains("header")));
    }

    #[test]
    fn test_unknown_merge_request_is_an_error() {
        let api = MockGitLab::new();
        assert!(collect_mr_template(&api, 99, HEADER, &ChecklistMarkers::default()).is_err());
    }
}
