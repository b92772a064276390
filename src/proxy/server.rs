use std::sync::Arc;

use color_eyre::{eyre::eyre, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::routes::{router, ProxyState};
use crate::config::Config;
use crate::jira::client::JiraClient;

/// Serve the proxy routes until Ctrl-C.
pub async fn serve(config: Config) -> Result<()> {
  let bind = config.server.bind;

  if let Err(e) = config.resolve_credentials() {
    // Not fatal: every request re-resolves and answers 500 until fixed
    warn!(error = %e, "Jira credentials are not configured");
  }

  let state = ProxyState::new(JiraClient::new()?, Arc::new(config));

  let listener = TcpListener::bind(bind)
    .await
    .map_err(|e| eyre!("Failed to bind {}: {}", bind, e))?;
  info!(addr = %bind, "Jira issues proxy listening");

  axum::serve(listener, router(state))
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| eyre!("Server error: {}", e))?;

  info!("Jira issues proxy stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    warn!(error = %e, "Failed to listen for Ctrl-C");
    // Without a signal handler, run until killed
    std::future::pending::<()>().await;
  }
}
