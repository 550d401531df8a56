//! Configuration System
//!
//! The configuration a generation run consumes: runtime family, version,
//! timezone, port list, firewall flag, assistant mode, and editor extensions.
//! Collection and validation happen here (and in the CLI wizard); the artifact
//! compilers treat a `DevcontainerConfig` as already valid. Invalid runtime or
//! assistant values are unrepresentable by construction.

use crate::error::GenerateError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default name of the configuration file inside a workspace root.
pub const CONFIG_FILE_NAME: &str = "devforge.toml";

/// Package manager for the node runtime family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodePackageManager {
    Pnpm,
    Bun,
}

/// Runtime family for the generated container.
///
/// The two node variants share a base image family and privileged user; the
/// python variant carries its own. Exactly one variant is ever active, which
/// is what keeps the registry/PyPI egress rules mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Runtime {
    Node(NodePackageManager),
    Python,
}

impl Runtime {
    /// True for either node variant.
    pub fn is_node(&self) -> bool {
        matches!(self, Runtime::Node(_))
    }

    /// Base image reference for this runtime at the given version.
    pub fn base_image(&self, version: &str) -> String {
        match self {
            Runtime::Node(_) => format!("node:{}", version),
            Runtime::Python => format!("python:{}", version),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Runtime::Node(NodePackageManager::Pnpm) => "node-pnpm",
            Runtime::Node(NodePackageManager::Bun) => "node-bun",
            Runtime::Python => "python",
        }
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Runtime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "node-pnpm" => Ok(Runtime::Node(NodePackageManager::Pnpm)),
            "node-bun" => Ok(Runtime::Node(NodePackageManager::Bun)),
            "python" => Ok(Runtime::Python),
            other => Err(format!(
                "Unknown runtime '{}'. Expected one of: node-pnpm, node-bun, python",
                other
            )),
        }
    }
}

impl Serialize for Runtime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Runtime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// How the coding-assistant CLI is configured in the container.
///
/// `Local` mounts host credential directories; `Fresh` installs the CLI but
/// starts from a clean configuration. Both enable identical network policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssistantMode {
    #[default]
    None,
    Local,
    Fresh,
}

impl AssistantMode {
    /// True when the assistant CLI (and its network domains) are enabled.
    pub fn enabled(&self) -> bool {
        !matches!(self, AssistantMode::None)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssistantMode::None => "none",
            AssistantMode::Local => "local",
            AssistantMode::Fresh => "fresh",
        }
    }
}

impl fmt::Display for AssistantMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Root configuration for one generation run.
///
/// Immutable for the duration of a run; each artifact compiler is a pure
/// function of this value and the resolved [`crate::policy::GenerationPolicy`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevcontainerConfig {
    /// Runtime family (node-pnpm, node-bun, python)
    pub runtime: Runtime,

    /// Version string, passed through verbatim into the base image tag
    pub runtime_version: String,

    /// IANA timezone, passed through verbatim
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Forwarded ports, ordered; the first port is labeled as primary.
    /// Duplicates are rendered independently, not deduplicated.
    #[serde(default)]
    pub ports: Vec<u16>,

    /// Gate for the firewall artifact and firewall blocks in the other two
    #[serde(default)]
    pub enable_firewall: bool,

    /// Assistant CLI configuration (none, local, fresh)
    #[serde(default)]
    pub assistant_mode: AssistantMode,

    /// Editor extension identifiers, emitted verbatim into the manifest
    #[serde(default)]
    pub extensions: Vec<String>,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    RuntimeVersion(String),
    Timezone(String),
    Extension(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::RuntimeVersion(msg) => write!(f, "Runtime version: {}", msg),
            ValidationError::Timezone(msg) => write!(f, "Timezone: {}", msg),
            ValidationError::Extension(msg) => write!(f, "Extension: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl DevcontainerConfig {
    /// Validate the configuration.
    ///
    /// Version and timezone values are otherwise passed through verbatim, so
    /// only emptiness and whitespace are rejected here.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.runtime_version.trim().is_empty() {
            errors.push(ValidationError::RuntimeVersion(
                "cannot be empty".to_string(),
            ));
        }
        if self.timezone.trim().is_empty() {
            errors.push(ValidationError::Timezone("cannot be empty".to_string()));
        }
        for ext in &self.extensions {
            if ext.trim().is_empty() {
                errors.push(ValidationError::Extension(
                    "identifier cannot be empty".to_string(),
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Loads and persists configuration files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from an explicit file path.
    pub fn load_from_file(path: &Path) -> Result<DevcontainerConfig, GenerateError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GenerateError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: DevcontainerConfig = toml::from_str(&content).map_err(|e| {
            GenerateError::ConfigError(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        Ok(config)
    }

    /// Load configuration from the workspace root (`devforge.toml`).
    pub fn load(workspace_root: &Path) -> Result<DevcontainerConfig, GenerateError> {
        let path = workspace_root.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Err(GenerateError::ConfigNotFound(path));
        }
        Self::load_from_file(&path)
    }

    /// Write configuration to the workspace root, returning the path written.
    pub fn save(
        config: &DevcontainerConfig,
        workspace_root: &Path,
    ) -> Result<PathBuf, GenerateError> {
        let path = workspace_root.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(config)
            .map_err(|e| GenerateError::ConfigError(format!("Failed to serialize: {}", e)))?;
        std::fs::write(&path, content)?;
        Ok(path)
    }
}
