//! Interactive configuration wizard.
//!
//! Collects a valid `DevcontainerConfig` from prompts. The artifact
//! compilers never see partially collected state; this module either returns
//! a complete configuration or an input error.

use crate::config::{AssistantMode, DevcontainerConfig, NodePackageManager, Runtime};
use crate::error::GenerateError;
use dialoguer::{Confirm, Input, Select};

/// Run the wizard and return the collected configuration.
pub fn collect_config() -> Result<DevcontainerConfig, GenerateError> {
    let runtime_selection = Select::new()
        .with_prompt("Runtime")
        .items(&["node-pnpm", "node-bun", "python"])
        .default(0)
        .interact()
        .map_err(input_error)?;
    let runtime = match runtime_selection {
        0 => Runtime::Node(NodePackageManager::Pnpm),
        1 => Runtime::Node(NodePackageManager::Bun),
        2 => Runtime::Python,
        _ => unreachable!(),
    };

    let default_version = match runtime {
        Runtime::Node(_) => "20",
        Runtime::Python => "3.12",
    };
    let runtime_version: String = Input::new()
        .with_prompt("Runtime version")
        .default(default_version.to_string())
        .interact_text()
        .map_err(input_error)?;

    let timezone: String = Input::new()
        .with_prompt("Timezone (IANA)")
        .default("UTC".to_string())
        .interact_text()
        .map_err(input_error)?;

    let ports_raw: String = Input::new()
        .with_prompt("Forwarded ports, comma-separated (first is primary)")
        .allow_empty(true)
        .interact_text()
        .map_err(input_error)?;
    let ports = parse_ports(&ports_raw)?;

    let enable_firewall = Confirm::new()
        .with_prompt("Enable egress firewall?")
        .default(true)
        .interact()
        .map_err(input_error)?;

    let assistant_selection = Select::new()
        .with_prompt("Assistant CLI")
        .items(&[
            "none (no assistant)",
            "local (mount host credentials)",
            "fresh (clean configuration)",
        ])
        .default(0)
        .interact()
        .map_err(input_error)?;
    let assistant_mode = match assistant_selection {
        0 => AssistantMode::None,
        1 => AssistantMode::Local,
        2 => AssistantMode::Fresh,
        _ => unreachable!(),
    };

    let extensions_raw: String = Input::new()
        .with_prompt("Editor extensions, comma-separated")
        .allow_empty(true)
        .interact_text()
        .map_err(input_error)?;
    let extensions = parse_extensions(&extensions_raw);

    Ok(DevcontainerConfig {
        runtime,
        runtime_version,
        timezone,
        ports,
        enable_firewall,
        assistant_mode,
        extensions,
    })
}

fn input_error(e: dialoguer::Error) -> GenerateError {
    GenerateError::InputError(format!("Failed to get user input: {}", e))
}

/// Parse a comma-separated port list. Order is kept as entered; duplicates
/// are kept as well, matching generation behavior.
fn parse_ports(raw: &str) -> Result<Vec<u16>, GenerateError> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| match s.parse::<u16>() {
            Ok(0) | Err(_) => Err(GenerateError::InputError(format!(
                "Invalid port '{}'. Expected 1-65535",
                s
            ))),
            Ok(port) => Ok(port),
        })
        .collect()
}

fn parse_extensions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}
