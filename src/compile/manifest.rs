//! Editor Manifest Compiler
//!
//! Renders the devcontainer manifest as a nested JSON document. Key order is
//! insertion order (`serde_json` with `preserve_order`), and the capability
//! grants are pushed onto the launch-argument list before anything else
//! touches it, so they always sit at the front.

use crate::compile::FIREWALL_SCRIPT_PATH;
use crate::config::{AssistantMode, DevcontainerConfig};
use crate::policy::GenerationPolicy;
use serde_json::{json, Map, Value};

/// Compile the editor manifest for a configuration.
pub fn compile(config: &DevcontainerConfig, policy: &GenerationPolicy) -> Value {
    let home = policy.home_dir();
    let mut root = Map::new();

    // Name placeholder resolved by the consuming editor, not here.
    root.insert(
        "name".to_string(),
        json!("${localWorkspaceFolderBasename}"),
    );

    root.insert(
        "build".to_string(),
        json!({
            "dockerfile": "Dockerfile",
            "args": {
                "TZ": format!("${{localEnv:TZ:{}}}", config.timezone),
            },
        }),
    );

    let mut run_args: Vec<Value> = Vec::new();
    if config.enable_firewall {
        // Must precede every other runArgs mutation: these go at the front.
        run_args.push(json!("--cap-add=NET_ADMIN"));
        run_args.push(json!("--cap-add=NET_RAW"));
    }
    run_args.push(json!("--name=${localWorkspaceFolderBasename}"));
    root.insert("runArgs".to_string(), Value::Array(run_args));

    root.insert(
        "customizations".to_string(),
        json!({
            "vscode": {
                "extensions": config.extensions,
                "settings": settings(config),
            },
        }),
    );

    let container_env = container_env(config, &home);
    if !container_env.is_empty() {
        root.insert("containerEnv".to_string(), Value::Object(container_env));
    }

    root.insert("remoteUser".to_string(), json!(policy.username));

    root.insert(
        "mounts".to_string(),
        Value::Array(mounts(config, &home)),
    );

    root.insert(
        "workspaceMount".to_string(),
        json!("source=${localWorkspaceFolder},target=/workspace,type=bind,consistency=delegated"),
    );
    root.insert("workspaceFolder".to_string(), json!("/workspace"));

    root.insert(
        "forwardPorts".to_string(),
        Value::Array(config.ports.iter().map(|p| json!(p)).collect()),
    );

    let mut ports_attributes = Map::new();
    for (i, port) in config.ports.iter().enumerate() {
        let label = if i == 0 {
            "Primary".to_string()
        } else {
            format!("Port {}", port)
        };
        // A repeated port collapses onto one key; the first occurrence
        // wins, so a duplicated primary port keeps its label.
        ports_attributes
            .entry(port.to_string())
            .or_insert(json!({ "label": label }));
    }
    root.insert(
        "portsAttributes".to_string(),
        Value::Object(ports_attributes),
    );

    if config.enable_firewall {
        root.insert(
            "postCreateCommand".to_string(),
            json!(format!("sudo {}", FIREWALL_SCRIPT_PATH)),
        );
    }

    Value::Object(root)
}

fn settings(config: &DevcontainerConfig) -> Value {
    let mut settings = Map::new();
    settings.insert(
        "terminal.integrated.defaultProfile.linux".to_string(),
        json!("zsh"),
    );
    if config.runtime.is_node() {
        settings.insert(
            "editor.defaultFormatter".to_string(),
            json!("esbenp.prettier-vscode"),
        );
    } else {
        settings.insert(
            "python.defaultInterpreterPath".to_string(),
            json!("/usr/local/bin/python"),
        );
        settings.insert(
            "editor.defaultFormatter".to_string(),
            json!("ms-python.black-formatter"),
        );
    }
    Value::Object(settings)
}

fn container_env(config: &DevcontainerConfig, home: &str) -> Map<String, Value> {
    let mut env = Map::new();
    if config.runtime.is_node() {
        env.insert(
            "NODE_OPTIONS".to_string(),
            json!("--max-old-space-size=4096"),
        );
    }
    if config.assistant_mode == AssistantMode::Local {
        env.insert(
            "CLAUDE_CONFIG_DIR".to_string(),
            json!(format!("{}/.claude", home)),
        );
    }
    env
}

fn mounts(config: &DevcontainerConfig, home: &str) -> Vec<Value> {
    let mut mounts = vec![json!(
        "source=devforge-bashhistory-${devcontainerId},target=/commandhistory,type=volume"
    )];

    // Host credentials are mounted for `local` only; `fresh` starts clean.
    if config.assistant_mode == AssistantMode::Local {
        mounts.push(json!(format!(
            "source=${{localEnv:HOME}}/.claude,target={}/.claude,type=bind",
            home
        )));
        mounts.push(json!(format!(
            "source=${{localEnv:HOME}}/.claude.json,target={}/.claude.json,type=bind",
            home
        )));
    }

    mounts
}
