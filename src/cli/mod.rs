pub mod orchestration;

pub use orchestration::{
    run_label_workflow, run_mr_info_workflow, run_mr_template_workflow,
    run_release_tags_workflow, run_tag_workflow, run_test_report_workflow, ReleaseTagsArgs,
    TagFetch, TagWorkflowArgs,
};
