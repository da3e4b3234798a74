use log::debug;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use super::{CreatedTag, MergeRequest, MergeRequestApi, MergeRequestCommit, TagRequest};
use crate::error::{AutotagError, Result};

const TOKEN_HEADER: &str = "PRIVATE-TOKEN";
const TOTAL_PAGES_HEADER: &str = "X-Total-Pages";

/// Blocking GitLab REST v4 client scoped to one project
pub struct GitLabClient {
    client: Client,
    project_url: Url,
    token: String,
    per_page: u32,
}

impl GitLabClient {
    /// Build a client for `base_url` (e.g. `https://gitlab.com/api/v4`).
    ///
    /// `project_id` may be numeric or a `group/project` path.
    pub fn new(
        base_url: &str,
        project_id: &str,
        token: &str,
        timeout: Duration,
        per_page: u32,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("gitlab-autotag/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AutotagError::configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        let base = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))
            .map_err(|e| AutotagError::configuration(format!("Invalid GitLab URL: {e}")))?;

        let project_url = base
            .join(&format!("projects/{}/", project_id.replace('/', "%2F")))
            .map_err(|e| AutotagError::configuration(format!("Invalid project id: {e}")))?;

        Ok(Self {
            client,
            project_url,
            token: token.to_string(),
            per_page,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.project_url
            .join(path)
            .map_err(|e| AutotagError::configuration(format!("Invalid endpoint '{path}': {e}")))
    }

    fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.header(TOKEN_HEADER, self.token.as_str()).send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(AutotagError::lookup(format!(
                "GitLab responded with status {}: {}",
                status.as_u16(),
                body
            )));
        }

        Ok(response)
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("GET {}", url);
        Ok(self.send(self.client.get(url))?.json()?)
    }

    fn commits_page(&self, iid: u64, page: u32) -> Result<(Vec<MergeRequestCommit>, u32)> {
        let mut url = self.endpoint(&format!("merge_requests/{iid}/commits"))?;
        url.query_pairs_mut()
            .append_pair("per_page", &self.per_page.to_string())
            .append_pair("page", &page.to_string());

        debug!("GET {}", url);
        let response = self.send(self.client.get(url))?;
        let total_pages = response
            .headers()
            .get(TOTAL_PAGES_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(1);

        Ok((response.json()?, total_pages))
    }
}

impl MergeRequestApi for GitLabClient {
    fn commit_merge_requests(&self, sha: &str) -> Result<Vec<MergeRequest>> {
        let url = self.endpoint(&format!("repository/commits/{sha}/merge_requests"))?;
        self.get_json(url)
    }

    fn merge_request(&self, iid: u64) -> Result<MergeRequest> {
        let url = self.endpoint(&format!("merge_requests/{iid}"))?;
        self.get_json(url)
    }

    fn merge_request_commits(&self, iid: u64) -> Result<Vec<MergeRequestCommit>> {
        let (mut commits, total_pages) = self.commits_page(iid, 1)?;
        for page in 2..=total_pages {
            let (next, _) = self.commits_page(iid, page)?;
            commits.extend(next);
        }
        Ok(commits)
    }

    fn create_tag(&self, request: &TagRequest) -> Result<CreatedTag> {
        let mut url = self.endpoint("repository/tags")?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("tag_name", &request.tag_name)
                .append_pair("ref", &request.target);
            if let Some(message) = &request.message {
                query.append_pair("message", message);
            }
        }

        debug!("POST {}", url);
        Ok(self.send(self.client.post(url))?.json()?)
    }

    fn add_merge_request_labels(&self, iid: u64, labels: &[String]) -> Result<MergeRequest> {
        let mut url = self.endpoint(&format!("merge_requests/{iid}"))?;
        url.query_pairs_mut()
            .append_pair("add_labels", &labels.join(","));

        debug!("PUT {}", url);
        Ok(self.send(self.client.put(url))?.json()?)
    }
}
