use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

/// Failure of the issues route, one response shape per variant
#[derive(Debug)]
pub enum ProxyError {
  /// Jira answered with a non-success status; relayed as-is
  Upstream { status: StatusCode, details: String },
  /// Anything else: network, configuration, unreadable body
  Internal(color_eyre::Report),
}

impl From<color_eyre::Report> for ProxyError {
  fn from(report: color_eyre::Report) -> Self {
    ProxyError::Internal(report)
  }
}

impl IntoResponse for ProxyError {
  fn into_response(self) -> Response {
    match self {
      ProxyError::Upstream { status, details } => {
        error!(%status, %details, "Jira API error");
        let body = json!({
          "error": format!("Failed to fetch issues from Jira: {}", status),
          "details": details,
        });
        (status, Json(body)).into_response()
      }
      ProxyError::Internal(report) => {
        error!(error = %report, "Failed to proxy Jira request");
        let body = json!({
          "error": "Internal server error",
          "message": report.to_string(),
        });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
      }
    }
  }
}
