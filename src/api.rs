//! Generation Facade
//!
//! Resolves the shared policy once, runs the three artifact compilers, and
//! writes the results into a `.devcontainer/` directory. The compilers are
//! pure; all I/O lives here.

use crate::compile::{firewall, manifest, recipe, FIREWALL_SCRIPT_NAME};
use crate::config::DevcontainerConfig;
use crate::error::GenerateError;
use crate::policy::GenerationPolicy;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One generation run's output. The firewall script is only produced when
/// the configuration enables it.
#[derive(Debug, Clone)]
pub struct ArtifactSet {
    pub manifest: serde_json::Value,
    pub dockerfile: String,
    pub firewall_script: Option<String>,
}

/// Generate all artifacts for a configuration.
///
/// The policy (privileged user, domain allow-list) is resolved exactly once
/// and handed to each compiler, so the artifacts stay mutually consistent.
pub fn generate(config: &DevcontainerConfig) -> ArtifactSet {
    let policy = GenerationPolicy::resolve(config);
    debug!(
        user = policy.username,
        domains = policy.domains.len(),
        "Resolved generation policy"
    );

    ArtifactSet {
        manifest: manifest::compile(config, &policy),
        dockerfile: recipe::compile(config, &policy),
        firewall_script: config
            .enable_firewall
            .then(|| firewall::compile(&policy)),
    }
}

/// Write an artifact set into `<workspace_root>/.devcontainer/`.
///
/// Returns the paths written, in write order. A disabled firewall produces
/// no script file.
pub fn write_artifacts(
    set: &ArtifactSet,
    workspace_root: &Path,
) -> Result<Vec<PathBuf>, GenerateError> {
    let dir = workspace_root.join(".devcontainer");
    std::fs::create_dir_all(&dir)?;

    let mut written = Vec::new();

    let manifest_path = dir.join("devcontainer.json");
    let mut manifest_text = serde_json::to_string_pretty(&set.manifest)
        .map_err(|e| GenerateError::ConfigError(format!("Failed to render manifest: {}", e)))?;
    manifest_text.push('\n');
    std::fs::write(&manifest_path, manifest_text)?;
    written.push(manifest_path);

    let dockerfile_path = dir.join("Dockerfile");
    std::fs::write(&dockerfile_path, &set.dockerfile)?;
    written.push(dockerfile_path);

    if let Some(ref script) = set.firewall_script {
        let script_path = dir.join(FIREWALL_SCRIPT_NAME);
        std::fs::write(&script_path, script)?;
        written.push(script_path);
    }

    info!(count = written.len(), dir = %dir.display(), "Artifacts written");
    Ok(written)
}
