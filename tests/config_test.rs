// tests/config_test.rs
use gitlab_autotag::config::{load_config, Config};
use gitlab_autotag::AutotagError;
use serial_test::serial;
use std::env;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

const CI_VARS: &[&str] = &[
    "CI_API_V4_URL",
    "CI_PROJECT_ID",
    "GITLAB_TOKEN",
    "CI_PRIVATE_TOKEN",
    "GITLAB_TIMEOUT_SECS",
    "TAG_PREFIX",
    "VERSION_MAJOR_LABEL",
    "VERSION_MINOR_LABEL",
    "CI_COMMIT_BRANCH",
    "CI_MERGE_REQUEST_IID",
    "CI_COMMIT_SHORT_SHA",
    "MERGE_REQUEST_HEADER_TEXT",
];

fn clear_ci_env() {
    for var in CI_VARS {
        env::remove_var(var);
    }
}

#[test]
fn test_load_default_config() {
    let config = Config::default();
    assert_eq!(config.gitlab.timeout_secs, 30);
    assert_eq!(config.gitlab.commits_per_page, 100);
    assert_eq!(config.merge_request.disabled_marker, "- [ ]");
    assert_eq!(config.merge_request.version_label, "version::minor");
    assert!(config.gitlab.project_id.is_none());
    assert!(config.tagging.output.is_none());
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
[gitlab]
project_id = "7"

[tagging]
prefix = "release-"
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path().to_str().unwrap())).unwrap();
    assert_eq!(config.gitlab.project_id.as_deref(), Some("7"));
    assert_eq!(config.tagging.prefix, "release-");
    // Unspecified fields keep their defaults
    assert_eq!(config.gitlab.base_url, "https://gitlab.com/api/v4");
    assert_eq!(config.tagging.major_label, "version::major");
}

#[test]
fn test_load_full_fixture() {
    let config =
        load_config(Some("tests/fixtures/autotag.toml")).expect("Failed to load test config");
    assert_eq!(config.gitlab.base_url, "https://gitlab.example.com/api/v4");
    assert_eq!(config.gitlab.project_id.as_deref(), Some("group/service"));
    assert_eq!(config.timeout(), Duration::from_secs(10));
    assert_eq!(config.gitlab.commits_per_page, 50);
    assert_eq!(config.tagging.prefix, "v");
    assert_eq!(config.tagging.output.as_deref(), Some("tag.json"));
    assert_eq!(config.merge_request.markers().enabled, "* [x]");
    assert_eq!(config.merge_request.version_label, "semver::minor");

    let policy = config.tagging.label_policy();
    assert_eq!(policy.major, "semver::major");
    assert_eq!(policy.minor, "semver::minor");
}

#[test]
fn test_invalid_toml_is_rejected() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[gitlab\nproject_id = 1").unwrap();
    temp_file.flush().unwrap();

    let result = load_config(Some(temp_file.path().to_str().unwrap()));
    assert!(matches!(result, Err(AutotagError::ConfigFile(_))));
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let result = load_config(Some("tests/fixtures/does-not-exist.toml"));
    assert!(matches!(result, Err(AutotagError::Io(_))));
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_ci_env();
    env::set_var("CI_PROJECT_ID", "99");
    env::set_var("GITLAB_TOKEN", "glpat-test");
    env::set_var("TAG_PREFIX", "rel-");
    env::set_var("CI_COMMIT_SHORT_SHA", "1282be0");
    env::set_var("MERGE_REQUEST_HEADER_TEXT", "Impacted:");

    let config = Config::load(Some("tests/fixtures/autotag.toml"));
    clear_ci_env();
    let config = config.unwrap();

    assert_eq!(config.project_id().unwrap(), "99");
    assert_eq!(config.token().unwrap(), "glpat-test");
    assert_eq!(config.tagging.prefix, "rel-");
    assert_eq!(config.commit_sha().unwrap(), "1282be0");
    assert_eq!(config.header_text().unwrap(), "Impacted:");
    // Values without an env override come from the file
    assert_eq!(config.target_branch().unwrap(), "main");
    assert!(config.validate_gitlab().is_ok());
}

#[test]
#[serial]
fn test_invalid_timeout_in_environment() {
    clear_ci_env();
    env::set_var("GITLAB_TIMEOUT_SECS", "soon");

    let result = Config::load(Some("tests/fixtures/autotag.toml"));
    clear_ci_env();

    assert!(matches!(result, Err(AutotagError::Configuration(_))));
}
