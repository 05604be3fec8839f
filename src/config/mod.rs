//! Configuration loading: the label taxonomy, the target repository and the
//! version manager.

pub mod context;

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::github::parse_github_remote;

pub use context::RunContext;

/// Default configuration file name, looked up in the workspace root.
pub const CONFIG_FILE: &str = "relasy.json";

/// Which taxonomy section a label belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LabelKind {
    ChangeType,
    Scope,
}

impl LabelKind {
    /// Textual label prefix (`type/...`, `scope/...`).
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::ChangeType => "type",
            Self::Scope => "scope",
        }
    }

    /// Name of the configuration section holding this kind's keys.
    pub fn section(&self) -> &'static str {
        match self {
            Self::ChangeType => "changeTypes",
            Self::Scope => "scopes",
        }
    }
}

/// Recognized change-type and scope keys mapped to their human-readable names.
///
/// Both maps keep declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Taxonomy {
    pub change_types: IndexMap<String, String>,
    #[serde(default)]
    pub scopes: IndexMap<String, String>,
}

impl Taxonomy {
    pub fn entries(&self, kind: LabelKind) -> &IndexMap<String, String> {
        match kind {
            LabelKind::ChangeType => &self.change_types,
            LabelKind::Scope => &self.scopes,
        }
    }

    /// Long name for a key, falling back to the key itself.
    pub fn long_name<'a>(&'a self, kind: LabelKind, key: &'a str) -> &'a str {
        self.entries(kind).get(key).map(String::as_str).unwrap_or(key)
    }

    /// Check that every key can round-trip through a label name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.change_types.is_empty() {
            return Err(ConfigError::EmptyChangeTypes);
        }

        for kind in [LabelKind::ChangeType, LabelKind::Scope] {
            for (key, long_name) in self.entries(kind) {
                let has_separator = key
                    .chars()
                    .any(|c| c == '/' || c == ':' || c.is_whitespace());
                if key.is_empty() || has_separator {
                    return Err(ConfigError::InvalidKey {
                        section: kind.section(),
                        key: key.clone(),
                    });
                }
                if long_name.trim().is_empty() {
                    return Err(ConfigError::EmptyLongName {
                        section: kind.section(),
                        key: key.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

/// How the project's version is read and bumped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Manager {
    /// `package.json` + `npm version`.
    #[default]
    Npm,
    /// `[package].version` in `Cargo.toml`.
    Cargo,
    /// User-defined shell commands; `next` receives `-b` for breaking releases.
    Custom { version: String, next: String },
}

/// Contents of `relasy.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Target repository as `owner/repo`. Falls back to the `origin` remote.
    #[serde(default)]
    pub gh: Option<String>,
    #[serde(flatten)]
    pub taxonomy: Taxonomy,
    #[serde(default)]
    pub manager: Manager,
}

impl Config {
    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::ReadFailed {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        let config: Config =
            serde_json::from_str(&content).map_err(|e| ConfigError::ParseFailed {
                path: path.to_path_buf(),
                source: e,
            })?;

        config.taxonomy.validate()?;
        Ok(config)
    }

    /// Resolve `(owner, repo)` from `gh`, or from the origin remote URL.
    pub fn repository(&self, origin_url: Option<&str>) -> Result<(String, String), ConfigError> {
        if let Some(gh) = &self.gh {
            return match gh.split_once('/') {
                Some((owner, repo))
                    if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') =>
                {
                    Ok((owner.to_string(), repo.to_string()))
                }
                _ => Err(ConfigError::InvalidRepository(gh.clone())),
            };
        }

        origin_url
            .and_then(|url| parse_github_remote(url).ok())
            .ok_or(ConfigError::MissingRepository)
    }
}
