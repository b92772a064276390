use color_eyre::{eyre::eyre, Result};
use std::future::Future;
use url::Url;

use crate::jira::api_types::ApiSearchResponse;
use crate::jira::types::Issue;

/// Where the card gets issues from when the cache can't answer
pub trait IssueSource: Send + Sync + 'static {
  fn fetch_issues(&self, project_key: &str) -> impl Future<Output = Result<Vec<Issue>>> + Send;
}

/// Calls the proxy route of the backend
#[derive(Clone)]
pub struct ProxyClient {
  http: reqwest::Client,
  base_url: Url,
}

impl ProxyClient {
  pub fn new(base_url: &str) -> Result<Self> {
    let base_url =
      Url::parse(base_url).map_err(|e| eyre!("Invalid proxy URL {}: {}", base_url, e))?;
    let http = reqwest::Client::builder()
      .user_agent(concat!("jira-issues/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self { http, base_url })
  }

  fn issues_url(&self, project_key: &str) -> Result<Url> {
    let mut url = self.base_url.clone();
    url
      .path_segments_mut()
      .map_err(|_| eyre!("Proxy URL cannot be a base: {}", self.base_url))?
      .pop_if_empty()
      .extend(["jira-issues", "issues", project_key]);
    Ok(url)
  }
}

impl IssueSource for ProxyClient {
  async fn fetch_issues(&self, project_key: &str) -> Result<Vec<Issue>> {
    let url = self.issues_url(project_key)?;

    let response = self
      .http
      .get(url)
      .send()
      .await
      .map_err(|e| eyre!("Failed to reach issues proxy: {}", e))?;

    let status = response.status();
    if !status.is_success() {
      return Err(eyre!("Failed to fetch issues: {}", status));
    }

    let body: ApiSearchResponse = response
      .json()
      .await
      .map_err(|e| eyre!("Failed to parse issues response: {}", e))?;

    Ok(body.into_issues())
  }
}
