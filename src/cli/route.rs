//! CLI route: single route table and run context. Dispatches to the
//! generation facade and presentation.

use crate::api;
use crate::cli::parse::Commands;
use crate::cli::wizard;
use crate::config::{ConfigLoader, DevcontainerConfig, CONFIG_FILE_NAME};
use crate::error::GenerateError;
use crate::policy::GenerationPolicy;
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::info;

/// Runtime context for CLI execution: workspace root and config path.
pub struct RunContext {
    workspace_root: PathBuf,
    config_path: Option<PathBuf>,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Self {
        RunContext {
            workspace_root,
            config_path,
        }
    }

    /// Execute a parsed command, returning the text to print on success.
    pub fn execute(&self, command: &Commands) -> Result<String, GenerateError> {
        match command {
            Commands::Init { force } => self.handle_init(*force),
            Commands::Generate { output, stdout } => {
                self.handle_generate(output.as_deref(), *stdout)
            }
            Commands::Check { format } => self.handle_check(format),
        }
    }

    fn load_config(&self) -> Result<DevcontainerConfig, GenerateError> {
        let config = match &self.config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&self.workspace_root)?,
        };
        config.validate().map_err(|errors| {
            let joined = errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            GenerateError::ValidationFailed(joined)
        })?;
        Ok(config)
    }

    fn handle_init(&self, force: bool) -> Result<String, GenerateError> {
        let path = self.workspace_root.join(CONFIG_FILE_NAME);
        if path.exists() && !force {
            return Err(GenerateError::ConfigError(format!(
                "{} already exists. Use --force to overwrite.",
                path.display()
            )));
        }

        let config = wizard::collect_config()?;
        config.validate().map_err(|errors| {
            GenerateError::ValidationFailed(
                errors
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        })?;

        let written = ConfigLoader::save(&config, &self.workspace_root)?;
        info!(path = %written.display(), "Configuration written");
        Ok(format!("Configuration written: {}", written.display()))
    }

    fn handle_generate(
        &self,
        output: Option<&Path>,
        stdout: bool,
    ) -> Result<String, GenerateError> {
        let config = self.load_config()?;
        let set = api::generate(&config);

        if stdout {
            return serde_json::to_string_pretty(&set.manifest).map_err(|e| {
                GenerateError::ConfigError(format!("Failed to render manifest: {}", e))
            });
        }

        let root = output.unwrap_or(&self.workspace_root);
        let written = api::write_artifacts(&set, root)?;

        let mut lines = vec![format!("Generated {} artifacts:", written.len())];
        for path in &written {
            lines.push(format!("  {}", path.display()));
        }
        Ok(lines.join("\n"))
    }

    fn handle_check(&self, format: &str) -> Result<String, GenerateError> {
        let config = self.load_config()?;
        let policy = GenerationPolicy::resolve(&config);

        let mut artifacts = vec!["devcontainer.json", "Dockerfile"];
        if config.enable_firewall {
            artifacts.push("init-firewall.sh");
        }

        match format {
            "json" => {
                let value = json!({
                    "runtime": config.runtime.as_str(),
                    "runtime_version": config.runtime_version,
                    "timezone": config.timezone,
                    "ports": config.ports,
                    "enable_firewall": config.enable_firewall,
                    "assistant_mode": config.assistant_mode.as_str(),
                    "user": policy.username,
                    "domains": policy.domains,
                    "artifacts": artifacts,
                });
                serde_json::to_string_pretty(&value).map_err(|e| {
                    GenerateError::ConfigError(format!("Failed to render status: {}", e))
                })
            }
            "text" => {
                let mut out = String::new();
                out.push_str(&format!("{}\n", "Configuration".bold()));
                out.push_str(&format!(
                    "  runtime:    {} ({})\n",
                    config.runtime,
                    config.runtime_version
                ));
                out.push_str(&format!("  timezone:   {}\n", config.timezone));
                out.push_str(&format!(
                    "  ports:      {:?}\n",
                    config.ports
                ));
                out.push_str(&format!("  firewall:   {}\n", config.enable_firewall));
                out.push_str(&format!("  assistant:  {}\n", config.assistant_mode));
                out.push_str(&format!("\n{}\n", "Resolved decisions".bold()));
                out.push_str(&format!("  user:       {}\n", policy.username.green()));
                out.push_str("  domains:\n");
                for domain in &policy.domains {
                    out.push_str(&format!("    {}\n", domain));
                }
                out.push_str(&format!("\n{}\n", "Artifacts".bold()));
                for artifact in &artifacts {
                    out.push_str(&format!("  {}\n", artifact.green()));
                }
                Ok(out)
            }
            other => Err(GenerateError::InputError(format!(
                "Unknown format '{}'. Expected: text, json",
                other
            ))),
        }
    }
}
