use crate::config::JiraCredentials;
use crate::jira::jql::MAX_RESULTS;
use color_eyre::{eyre::eyre, Result};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use tracing::debug;
use url::Url;

/// Raw upstream answer, relayed by the proxy without interpretation
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
  pub status: StatusCode,
  pub body: String,
}

/// Jira REST client for the search endpoint
#[derive(Clone, Default)]
pub struct JiraClient {
  http: reqwest::Client,
}

impl JiraClient {
  pub fn new() -> Result<Self> {
    let http = reqwest::Client::builder()
      .user_agent(concat!("jira-issues/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self { http })
  }

  /// Build `{base}/rest/api/2/search?jql=...&maxResults=1000`
  pub fn search_url(base_url: &str, jql: &str) -> Result<Url> {
    let endpoint = format!("{}/rest/api/2/search", base_url.trim_end_matches('/'));
    Url::parse_with_params(
      &endpoint,
      &[("jql", jql), ("maxResults", &MAX_RESULTS.to_string())],
    )
    .map_err(|e| eyre!("Invalid Jira URL {}: {}", base_url, e))
  }

  /// Search for issues using JQL. A single request, no pagination.
  ///
  /// Non-success statuses are returned, not raised; only transport failures
  /// are errors.
  pub async fn search(&self, credentials: &JiraCredentials, url: Url) -> Result<UpstreamResponse> {
    let response = self
      .http
      .get(url)
      .header(AUTHORIZATION, format!("Bearer {}", credentials.token))
      .header(ACCEPT, "application/json")
      .send()
      .await
      .map_err(|e| eyre!("Failed to reach Jira: {}", e))?;

    let status = response.status();
    let body = response
      .text()
      .await
      .map_err(|e| eyre!("Failed to read Jira response: {}", e))?;

    debug!(%status, bytes = body.len(), "Jira search response");
    Ok(UpstreamResponse { status, body })
  }
}
