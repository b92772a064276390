use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub jira: JiraConfig,
  #[serde(default)]
  pub server: ServerConfig,
  #[serde(default)]
  pub card: CardConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JiraConfig {
  /// Base URL of the Jira instance; `JIRA_URL` takes precedence when set
  pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_bind")]
  pub bind: SocketAddr,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      bind: default_bind(),
    }
  }
}

fn default_bind() -> SocketAddr {
  SocketAddr::from(([127, 0, 0, 1], 7007))
}

#[derive(Debug, Clone, Deserialize)]
pub struct CardConfig {
  /// Where the proxy route is served
  #[serde(default = "default_proxy_url")]
  pub proxy_url: String,
  #[serde(default)]
  pub theme: Theme,
}

impl Default for CardConfig {
  fn default() -> Self {
    Self {
      proxy_url: default_proxy_url(),
      theme: Theme::default(),
    }
  }
}

fn default_proxy_url() -> String {
  "http://127.0.0.1:7007".to_string()
}

/// Visual mode of the surrounding terminal
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
  #[default]
  Dark,
  Light,
}

/// Upstream connection details, resolved when a request needs them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JiraCredentials {
  pub base_url: String,
  pub token: String,
}

/// Source of upstream credentials for the proxy route.
///
/// Resolved on every request so a missing value fails that request only.
pub trait CredentialsProvider: Send + Sync {
  fn jira_credentials(&self) -> Result<JiraCredentials>;
}

impl CredentialsProvider for Config {
  fn jira_credentials(&self) -> Result<JiraCredentials> {
    self.resolve_credentials()
  }
}

impl CredentialsProvider for JiraCredentials {
  fn jira_credentials(&self) -> Result<JiraCredentials> {
    Ok(self.clone())
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./jira-issues.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/jira-issues/config.yaml
  ///
  /// Without any file the defaults are used.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    if let Some(p) = explicit_path {
      if !p.exists() {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
      return Self::load_from_path(p);
    }

    match Self::find_config_file() {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("jira-issues.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("jira-issues").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::from_yaml(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn from_yaml(contents: &str) -> Result<Self> {
    // An empty file is a valid, all-defaults config
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }
    Ok(serde_yaml::from_str(contents)?)
  }

  /// Resolve the Jira base URL and API token.
  ///
  /// The URL comes from `JIRA_URL` or the config file; the token from
  /// `JIRA_ISSUES_TOKEN`, falling back to `JIRA_API_TOKEN`.
  pub fn resolve_credentials(&self) -> Result<JiraCredentials> {
    let base_url = std::env::var("JIRA_URL")
      .ok()
      .or_else(|| self.jira.url.clone())
      .filter(|u| !u.trim().is_empty())
      .ok_or_else(|| eyre!("Missing required configuration value: jira.url"))?;

    Ok(JiraCredentials {
      base_url,
      token: Self::get_api_token()?,
    })
  }

  /// Get the Jira API token from environment variables.
  pub fn get_api_token() -> Result<String> {
    std::env::var("JIRA_ISSUES_TOKEN")
      .or_else(|_| std::env::var("JIRA_API_TOKEN"))
      .map_err(|_| {
        eyre!(
          "Missing required configuration value: Jira API token. \
           Set JIRA_ISSUES_TOKEN or JIRA_API_TOKEN."
        )
      })
  }
}
