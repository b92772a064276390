//! Catalog entity descriptors.
//!
//! The card reads the Jira project key of an entity from its
//! `jira/project-key` annotation.

use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

pub const PROJECT_KEY_ANNOTATION: &str = "jira/project-key";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Entity {
  #[serde(default)]
  pub kind: Option<String>,
  #[serde(default)]
  pub metadata: EntityMetadata,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntityMetadata {
  #[serde(default)]
  pub name: Option<String>,
  /// Values are free-form; only string values are read
  #[serde(default)]
  pub annotations: BTreeMap<String, serde_yaml::Value>,
}

impl Entity {
  pub fn load(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read entity file {}: {}", path.display(), e))?;

    Self::from_yaml(&contents)
  }

  /// Parse the first document of a descriptor file
  pub fn from_yaml(yaml: &str) -> Result<Self> {
    let Some(document) = serde_yaml::Deserializer::from_str(yaml).next() else {
      return Ok(Self::default());
    };

    Entity::deserialize(document).map_err(|e| eyre!("Failed to parse entity: {}", e))
  }

  /// The annotated project key, if present and not blank
  pub fn project_key(&self) -> Option<&str> {
    self
      .metadata
      .annotations
      .get(PROJECT_KEY_ANNOTATION)
      .and_then(|value| value.as_str())
      .map(|key| key.trim())
      .filter(|key| !key.is_empty())
  }
}
