//! End-to-end scenarios exercising several configuration axes at once.

use devforge::api;
use devforge::config::{
    AssistantMode, DevcontainerConfig, NodePackageManager, Runtime,
};

#[test]
fn test_node_bun_firewalled_local_assistant() {
    let config = DevcontainerConfig {
        runtime: Runtime::Node(NodePackageManager::Bun),
        runtime_version: "20".to_string(),
        timezone: "UTC".to_string(),
        ports: vec![3000, 5432],
        enable_firewall: true,
        assistant_mode: AssistantMode::Local,
        extensions: vec!["dbaeumer.vscode-eslint".to_string()],
    };
    let set = api::generate(&config);

    // Recipe: bun install path, no pnpm, firewall bootstrap for the node user.
    assert!(set.dockerfile.contains("bun.sh/install"));
    assert!(!set.dockerfile.contains("npm install -g pnpm"));
    assert!(set
        .dockerfile
        .contains("node ALL=(root) NOPASSWD: /usr/local/bin/init-firewall.sh"));

    // Manifest: capability flags first, numbered secondary port label.
    let run_args = set.manifest["runArgs"].as_array().unwrap();
    assert_eq!(run_args[0], "--cap-add=NET_ADMIN");
    assert_eq!(run_args[1], "--cap-add=NET_RAW");
    assert_eq!(set.manifest["portsAttributes"]["3000"]["label"], "Primary");
    assert_eq!(set.manifest["portsAttributes"]["5432"]["label"], "Port 5432");

    // Local assistant: credentials mounted and pointed at.
    let mounts = set.manifest["mounts"].as_array().unwrap();
    assert!(mounts.iter().any(|m| m.as_str().unwrap().contains(".claude,target=")));
    assert!(mounts.iter().any(|m| m.as_str().unwrap().contains(".claude.json")));
    assert_eq!(
        set.manifest["containerEnv"]["CLAUDE_CONFIG_DIR"],
        "/home/node/.claude"
    );

    assert!(set.firewall_script.is_some());
}

#[test]
fn test_python_minimal_no_firewall_no_assistant() {
    let config = DevcontainerConfig {
        runtime: Runtime::Python,
        runtime_version: "3.12".to_string(),
        timezone: "UTC".to_string(),
        ports: vec![],
        enable_firewall: false,
        assistant_mode: AssistantMode::None,
        extensions: vec![],
    };
    let set = api::generate(&config);

    // No firewall artifact, no packet-filter packages, no post-create hook.
    assert!(set.firewall_script.is_none());
    assert!(!set.dockerfile.contains("iptables"));
    assert!(!set.dockerfile.contains("ipset"));
    assert!(set.manifest.get("postCreateCommand").is_none());

    // No assistant CLI or node runtime on the python branch.
    assert!(!set.dockerfile.contains("claude-code"));
    assert!(!set.dockerfile.contains("nodesource"));

    assert_eq!(set.manifest["forwardPorts"], serde_json::json!([]));
    assert!(set.dockerfile.contains("FROM python:3.12"));
}

#[test]
fn test_fresh_assistant_installs_cli_without_credential_mounts() {
    let config = DevcontainerConfig {
        runtime: Runtime::Node(NodePackageManager::Pnpm),
        runtime_version: "22".to_string(),
        timezone: "UTC".to_string(),
        ports: vec![8080],
        enable_firewall: false,
        assistant_mode: AssistantMode::Fresh,
        extensions: vec![],
    };
    let set = api::generate(&config);

    // The recipe installs the CLI in both local and fresh modes.
    assert!(set
        .dockerfile
        .contains("npm install -g @anthropic-ai/claude-code"));

    // The manifest carries none of the three credential artifacts.
    let mounts = set.manifest["mounts"].as_array().unwrap();
    assert_eq!(mounts.len(), 1);
    assert!(!mounts[0].as_str().unwrap().contains(".claude"));
    let env = set.manifest.get("containerEnv");
    if let Some(env) = env {
        assert!(env.get("CLAUDE_CONFIG_DIR").is_none());
    }
}

#[test]
fn test_duplicate_ports_rendered_independently() {
    let config = DevcontainerConfig {
        runtime: Runtime::Node(NodePackageManager::Pnpm),
        runtime_version: "20".to_string(),
        timezone: "UTC".to_string(),
        ports: vec![3000, 5432, 3000],
        enable_firewall: false,
        assistant_mode: AssistantMode::None,
        extensions: vec![],
    };
    let set = api::generate(&config);

    // forwardPorts keeps every entry; portsAttributes collapses on the key
    // with the first occurrence winning, so the primary label survives.
    assert_eq!(
        set.manifest["forwardPorts"],
        serde_json::json!([3000, 5432, 3000])
    );
    assert_eq!(set.manifest["portsAttributes"]["3000"]["label"], "Primary");
    assert_eq!(set.manifest["portsAttributes"]["5432"]["label"], "Port 5432");
}
