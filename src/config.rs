use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::domain::{ChecklistMarkers, LabelPolicy};
use crate::error::{AutotagError, Result};

/// Represents the complete configuration for gitlab-autotag.
///
/// Loaded once per run from an optional TOML file with CI environment
/// variables laid on top, then passed by reference to every workflow.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub gitlab: GitLabConfig,

    #[serde(default)]
    pub tagging: TaggingConfig,

    #[serde(default)]
    pub merge_request: MergeRequestConfig,
}

fn default_base_url() -> String {
    "https://gitlab.com/api/v4".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_commits_per_page() -> u32 {
    100
}

fn default_major_label() -> String {
    "version::major".to_string()
}

fn default_minor_label() -> String {
    "version::minor".to_string()
}

fn default_enabled_marker() -> String {
    "- [x]".to_string()
}

fn default_disabled_marker() -> String {
    "- [ ]".to_string()
}

/// Connection settings for the GitLab REST API.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitLabConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub project_id: Option<String>,

    #[serde(default)]
    pub token: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_commits_per_page")]
    pub commits_per_page: u32,
}

impl Default for GitLabConfig {
    fn default() -> Self {
        GitLabConfig {
            base_url: default_base_url(),
            project_id: None,
            token: None,
            timeout_secs: default_timeout_secs(),
            commits_per_page: default_commits_per_page(),
        }
    }
}

/// Settings for the tag bump job.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TaggingConfig {
    #[serde(default)]
    pub prefix: String,

    #[serde(default = "default_major_label")]
    pub major_label: String,

    #[serde(default = "default_minor_label")]
    pub minor_label: String,

    /// Branch whose merge requests decide the bump
    #[serde(default)]
    pub target_branch: Option<String>,

    /// Where to write the tag artifact
    #[serde(default)]
    pub output: Option<String>,
}

impl Default for TaggingConfig {
    fn default() -> Self {
        TaggingConfig {
            prefix: String::new(),
            major_label: default_major_label(),
            minor_label: default_minor_label(),
            target_branch: None,
            output: None,
        }
    }
}

impl TaggingConfig {
    pub fn label_policy(&self) -> LabelPolicy {
        LabelPolicy::new(self.major_label.clone(), self.minor_label.clone())
    }
}

/// Settings for the merge request metadata jobs.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MergeRequestConfig {
    #[serde(default)]
    pub iid: Option<u64>,

    #[serde(default)]
    pub commit_sha: Option<String>,

    #[serde(default)]
    pub header_text: Option<String>,

    #[serde(default = "default_enabled_marker")]
    pub enabled_marker: String,

    #[serde(default = "default_disabled_marker")]
    pub disabled_marker: String,

    /// Label applied by `label-mr`
    #[serde(default = "default_minor_label")]
    pub version_label: String,
}

impl Default for MergeRequestConfig {
    fn default() -> Self {
        MergeRequestConfig {
            iid: None,
            commit_sha: None,
            header_text: None,
            enabled_marker: default_enabled_marker(),
            disabled_marker: default_disabled_marker(),
            version_label: default_minor_label(),
        }
    }
}

impl MergeRequestConfig {
    pub fn markers(&self) -> ChecklistMarkers {
        ChecklistMarkers {
            enabled: self.enabled_marker.clone(),
            disabled: self.disabled_marker.clone(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `autotag.toml` in current directory
/// 3. `.autotag.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./autotag.toml").exists() {
        fs::read_to_string("./autotag.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".autotag.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}

impl Config {
    /// File (or defaults) overlaid with the process environment.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = load_config(config_path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Overlay CI variables read through `lookup`. Empty values count as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = var("CI_API_V4_URL") {
            self.gitlab.base_url = url;
        }
        if let Some(project) = var("CI_PROJECT_ID") {
            self.gitlab.project_id = Some(project);
        }
        if let Some(token) = var("GITLAB_TOKEN").or_else(|| var("CI_PRIVATE_TOKEN")) {
            self.gitlab.token = Some(token);
        }
        if let Some(timeout) = var("GITLAB_TIMEOUT_SECS") {
            self.gitlab.timeout_secs = parse_number("GITLAB_TIMEOUT_SECS", &timeout)?;
        }
        if let Some(prefix) = var("TAG_PREFIX") {
            self.tagging.prefix = prefix;
        }
        if let Some(label) = var("VERSION_MAJOR_LABEL") {
            self.tagging.major_label = label;
        }
        if let Some(label) = var("VERSION_MINOR_LABEL") {
            self.tagging.minor_label = label;
        }
        if let Some(branch) = var("CI_COMMIT_BRANCH") {
            self.tagging.target_branch = Some(branch);
        }
        // Outside merge request pipelines GitLab can leave the variable unexpanded.
        if let Some(iid) = var("CI_MERGE_REQUEST_IID").filter(|v| v != "$CI_MERGE_REQUEST_IID") {
            self.merge_request.iid = Some(parse_number("CI_MERGE_REQUEST_IID", &iid)?);
        }
        if let Some(sha) = var("CI_COMMIT_SHORT_SHA") {
            self.merge_request.commit_sha = Some(sha);
        }
        if let Some(header) = var("MERGE_REQUEST_HEADER_TEXT") {
            self.merge_request.header_text = Some(header);
        }

        Ok(())
    }

    pub fn project_id(&self) -> Result<&str> {
        require(self.gitlab.project_id.as_deref(), "CI_PROJECT_ID")
    }

    pub fn token(&self) -> Result<&str> {
        require(self.gitlab.token.as_deref(), "GITLAB_TOKEN")
    }

    pub fn merge_request_iid(&self) -> Result<u64> {
        self.merge_request
            .iid
            .ok_or_else(|| missing("CI_MERGE_REQUEST_IID"))
    }

    pub fn commit_sha(&self) -> Result<&str> {
        require(self.merge_request.commit_sha.as_deref(), "CI_COMMIT_SHORT_SHA")
    }

    pub fn header_text(&self) -> Result<&str> {
        require(
            self.merge_request.header_text.as_deref(),
            "MERGE_REQUEST_HEADER_TEXT",
        )
    }

    pub fn target_branch(&self) -> Result<&str> {
        require(self.tagging.target_branch.as_deref(), "CI_COMMIT_BRANCH")
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.gitlab.timeout_secs)
    }

    /// Check everything any GitLab call needs.
    pub fn validate_gitlab(&self) -> Result<()> {
        self.project_id()?;
        self.token()?;
        if self.gitlab.timeout_secs == 0 {
            return Err(AutotagError::configuration(
                "GitLab request timeout must be greater than zero",
            ));
        }
        Ok(())
    }
}

fn require<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str> {
    value.ok_or_else(|| missing(name))
}

fn missing(name: &str) -> AutotagError {
    AutotagError::configuration(format!("{} is not set", name))
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse::<T>().map_err(|_| {
        AutotagError::configuration(format!("{} must be a number, got '{}'", name, value))
    })
}
