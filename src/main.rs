mod app;
mod card;
mod catalog;
mod config;
mod event;
mod jira;
mod logging;
mod proxy;
mod query;
mod ui;

use card::loader::IssueLoader;
use card::source::ProxyClient;
use card::store::{KeyValueStore, MemoryStore, SqliteStore};
use clap::{Parser, Subcommand};
use color_eyre::Result;
use config::{Config, Theme};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "jira-issues")]
#[command(about = "Open Jira issues for catalog entities")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/jira-issues/config.yaml)
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Serve the authenticated Jira proxy routes
  Serve {
    /// Address to listen on
    #[arg(short, long)]
    bind: Option<SocketAddr>,
  },
  /// Show the issue card for an entity
  Card {
    /// Entity descriptor holding the jira/project-key annotation
    #[arg(short, long, default_value = "catalog-info.yaml")]
    entity: PathBuf,

    /// Jira project key, instead of the annotation
    #[arg(short, long)]
    project: Option<String>,

    #[arg(short, long, value_enum)]
    theme: Option<Theme>,

    /// Keep cached issues in memory only
    #[arg(long)]
    ephemeral: bool,
  },
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();
  let mut config = Config::load(args.config.as_deref())?;

  match args.command {
    Command::Serve { bind } => {
      logging::init_stdout()?;
      if let Some(bind) = bind {
        config.server.bind = bind;
      }
      proxy::serve(config).await
    }
    Command::Card {
      entity,
      project,
      theme,
      ephemeral,
    } => {
      let _guard = logging::init_file()?;

      let project_key = match project {
        Some(project) => Some(project.trim().to_string()).filter(|p| !p.is_empty()),
        None => {
          let descriptor = catalog::Entity::load(&entity)?;
          info!(
            name = descriptor.metadata.name.as_deref().unwrap_or("-"),
            kind = descriptor.kind.as_deref().unwrap_or("-"),
            "Read catalog entity"
          );
          descriptor.project_key().map(str::to_string)
        }
      };
      let Some(project_key) = project_key else {
        info!(entity = %entity.display(), "No Jira project key annotated, nothing to show");
        return Ok(());
      };

      let theme = theme.unwrap_or(config.card.theme);
      let source = ProxyClient::new(&config.card.proxy_url)?;

      if ephemeral {
        run_card(MemoryStore::new(), source, project_key, theme).await
      } else {
        run_card(SqliteStore::open()?, source, project_key, theme).await
      }
    }
  }
}

async fn run_card<S: KeyValueStore + 'static>(
  store: S,
  source: ProxyClient,
  project_key: String,
  theme: Theme,
) -> Result<()> {
  let loader = Arc::new(IssueLoader::new(store, source));
  let mut app = app::App::new(project_key, loader, theme);
  app.run().await
}
