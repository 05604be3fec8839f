//! Project version managers: read the declared version and bump it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use semver::Version;
use tokio::process::Command;
use tracing::debug;

use crate::config::Manager;
use crate::error::ModuleError;

use super::bump::BumpPolicy;

/// The project's version collaborator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VersionModule: Send + Sync {
    /// Currently declared version, as written in the project.
    async fn version(&self) -> Result<String, ModuleError>;

    /// Bump the declared version in place.
    async fn bump(&self, policy: BumpPolicy) -> Result<(), ModuleError>;
}

/// Build the module for a configured manager, rooted at `workspace`.
pub fn setup_module(manager: &Manager, workspace: &Path) -> Arc<dyn VersionModule> {
    let workspace = workspace.to_path_buf();
    match manager {
        Manager::Npm => Arc::new(NpmModule { workspace }),
        Manager::Cargo => Arc::new(CargoModule { workspace }),
        Manager::Custom { version, next } => Arc::new(CustomModule {
            workspace,
            version_command: version.clone(),
            next_command: next.clone(),
        }),
    }
}

/// Apply a policy to a semantic version.
pub fn bump_version(current: &Version, policy: BumpPolicy) -> Version {
    match policy {
        BumpPolicy::Breaking => Version::new(current.major + 1, 0, 0),
        BumpPolicy::Normal => Version::new(current.major, current.minor + 1, 0),
    }
}

/// Run a program and return its stdout.
async fn run(program: &str, args: &[&str], cwd: &Path) -> Result<String, ModuleError> {
    let command = std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ");

    let output = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .output()
        .await
        .map_err(|source| ModuleError::SpawnFailed {
            command: command.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(ModuleError::CommandFailed {
            command,
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    debug!(%command, "Command succeeded");
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn read_manifest(path: &Path) -> Result<String, ModuleError> {
    std::fs::read_to_string(path).map_err(|source| ModuleError::ManifestRead {
        path: path.to_path_buf(),
        source,
    })
}

/// `package.json` + `npm version`.
pub struct NpmModule {
    workspace: PathBuf,
}

#[async_trait]
impl VersionModule for NpmModule {
    async fn version(&self) -> Result<String, ModuleError> {
        let path = self.workspace.join("package.json");
        let json: serde_json::Value =
            serde_json::from_str(&read_manifest(&path)?).map_err(|e| ModuleError::ManifestParse {
                path: path.clone(),
                message: format!("Invalid JSON: {}", e),
            })?;

        json.get("version")
            .and_then(|v| v.as_str())
            .map(String::from)
            .ok_or(ModuleError::MissingVersion(path))
    }

    async fn bump(&self, policy: BumpPolicy) -> Result<(), ModuleError> {
        if which::which("npm").is_err() {
            return Err(ModuleError::ToolNotFound("npm".to_string()));
        }

        let increment = match policy {
            BumpPolicy::Breaking => "major",
            BumpPolicy::Normal => "minor",
        };
        run(
            "npm",
            &["version", increment, "--no-git-tag-version"],
            &self.workspace,
        )
        .await?;
        Ok(())
    }
}

/// `[package].version` in `Cargo.toml`, edited in place.
pub struct CargoModule {
    workspace: PathBuf,
}

impl CargoModule {
    fn manifest(&self) -> PathBuf {
        self.workspace.join("Cargo.toml")
    }

    fn parse(&self, path: &Path) -> Result<toml_edit::DocumentMut, ModuleError> {
        read_manifest(path)?
            .parse::<toml_edit::DocumentMut>()
            .map_err(|e| ModuleError::ManifestParse {
                path: path.to_path_buf(),
                message: format!("Invalid TOML: {}", e),
            })
    }

    fn declared(&self, path: &Path, doc: &toml_edit::DocumentMut) -> Result<String, ModuleError> {
        doc.get("package")
            .and_then(|p| p.get("version"))
            .and_then(|v| v.as_str())
            .map(String::from)
            .ok_or_else(|| ModuleError::MissingVersion(path.to_path_buf()))
    }
}

#[async_trait]
impl VersionModule for CargoModule {
    async fn version(&self) -> Result<String, ModuleError> {
        let path = self.manifest();
        let doc = self.parse(&path)?;
        self.declared(&path, &doc)
    }

    async fn bump(&self, policy: BumpPolicy) -> Result<(), ModuleError> {
        let path = self.manifest();
        let mut doc = self.parse(&path)?;
        let declared = self.declared(&path, &doc)?;
        let current =
            Version::parse(&declared).map_err(|e| ModuleError::InvalidVersion(declared, e))?;

        let next = bump_version(&current, policy);
        doc["package"]["version"] = toml_edit::value(next.to_string());

        std::fs::write(&path, doc.to_string()).map_err(|source| ModuleError::ManifestWrite {
            path: path.clone(),
            source,
        })?;
        debug!(%current, %next, "Bumped Cargo.toml version");
        Ok(())
    }
}

/// User-defined shell commands.
pub struct CustomModule {
    workspace: PathBuf,
    version_command: String,
    next_command: String,
}

impl CustomModule {
    /// The bump command line for a policy; breaking releases get `-b`.
    pub fn next_command_line(&self, policy: BumpPolicy) -> String {
        match policy {
            BumpPolicy::Breaking => format!("{} -b", self.next_command),
            BumpPolicy::Normal => self.next_command.clone(),
        }
    }
}

#[async_trait]
impl VersionModule for CustomModule {
    async fn version(&self) -> Result<String, ModuleError> {
        let stdout = run("sh", &["-c", &self.version_command], &self.workspace).await?;
        let version = stdout.trim();
        if version.is_empty() {
            return Err(ModuleError::EmptyVersion);
        }
        Ok(version.to_string())
    }

    async fn bump(&self, policy: BumpPolicy) -> Result<(), ModuleError> {
        let command = self.next_command_line(policy);
        let stdout = run("sh", &["-c", &command], &self.workspace).await?;
        debug!(output = %stdout.trim(), "Custom bump finished");
        Ok(())
    }
}
