use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use color_eyre::eyre::eyre;
use serde_json::{json, Value};
use tracing::info;

use super::error::ProxyError;
use crate::config::CredentialsProvider;
use crate::jira::client::JiraClient;
use crate::jira::jql::open_issues_jql;

pub const HEALTH_MESSAGE: &str = "Jira issues plugin backend is working";

/// Shared state of the proxy routes
#[derive(Clone)]
pub struct ProxyState {
  jira: JiraClient,
  credentials: Arc<dyn CredentialsProvider>,
}

impl ProxyState {
  pub fn new(jira: JiraClient, credentials: Arc<dyn CredentialsProvider>) -> Self {
    Self { jira, credentials }
  }
}

/// Both routes are served without caller authentication.
pub fn router(state: ProxyState) -> Router {
  Router::new()
    .route("/jira-issues/test", get(health))
    .route("/jira-issues/issues/:project_key", get(project_issues))
    .with_state(state)
}

async fn health() -> Json<Value> {
  Json(json!({ "message": HEALTH_MESSAGE }))
}

async fn project_issues(
  State(state): State<ProxyState>,
  Path(project_key): Path<String>,
) -> Result<Response, ProxyError> {
  info!(%project_key, "Issues requested");

  let credentials = state.credentials.jira_credentials()?;
  let url = JiraClient::search_url(&credentials.base_url, &open_issues_jql(&project_key))?;
  info!(%url, "Querying Jira");

  let upstream = state.jira.search(&credentials, url).await?;
  info!(status = %upstream.status, "Jira responded");

  if !upstream.status.is_success() {
    return Err(ProxyError::Upstream {
      status: upstream.status,
      details: upstream.body,
    });
  }

  let body: Value = serde_json::from_str(&upstream.body)
    .map_err(|e| eyre!("Jira returned a non-JSON body: {}", e))?;

  Ok((upstream.status, Json(body)).into_response())
}
