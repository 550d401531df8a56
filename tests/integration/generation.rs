//! Integration tests for the generation facade: one policy resolution, three
//! compilers, one writer.

use devforge::api;
use devforge::config::{
    AssistantMode, DevcontainerConfig, NodePackageManager, Runtime,
};
use tempfile::TempDir;

fn config() -> DevcontainerConfig {
    DevcontainerConfig {
        runtime: Runtime::Node(NodePackageManager::Pnpm),
        runtime_version: "20".to_string(),
        timezone: "UTC".to_string(),
        ports: vec![3000],
        enable_firewall: true,
        assistant_mode: AssistantMode::Fresh,
        extensions: vec![],
    }
}

#[test]
fn test_written_manifest_is_valid_json() {
    let temp_dir = TempDir::new().unwrap();
    let set = api::generate(&config());
    api::write_artifacts(&set, temp_dir.path()).unwrap();

    let manifest_text =
        std::fs::read_to_string(temp_dir.path().join(".devcontainer/devcontainer.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&manifest_text).unwrap();
    assert_eq!(parsed["workspaceFolder"], "/workspace");
}

#[test]
fn test_firewall_script_written_with_shebang() {
    let temp_dir = TempDir::new().unwrap();
    let set = api::generate(&config());
    api::write_artifacts(&set, temp_dir.path()).unwrap();

    let script =
        std::fs::read_to_string(temp_dir.path().join(".devcontainer/init-firewall.sh")).unwrap();
    assert!(script.starts_with("#!/bin/bash"));
    assert!(script.contains("set -euo pipefail"));
}

#[test]
fn test_disabled_firewall_produces_two_artifacts() {
    let temp_dir = TempDir::new().unwrap();
    let mut cfg = config();
    cfg.enable_firewall = false;

    let set = api::generate(&cfg);
    let written = api::write_artifacts(&set, temp_dir.path()).unwrap();

    assert_eq!(written.len(), 2);
    assert!(!temp_dir.path().join(".devcontainer/init-firewall.sh").exists());
}

#[test]
fn test_artifacts_agree_on_privileged_user() {
    // The user mapping is resolved once and shared, so the manifest's
    // remoteUser, the recipe's USER drop, and the sudoers entry in the
    // firewall bootstrap all name the same account.
    for (runtime, user) in [
        (Runtime::Node(NodePackageManager::Pnpm), "node"),
        (Runtime::Node(NodePackageManager::Bun), "node"),
        (Runtime::Python, "vscode"),
    ] {
        let mut cfg = config();
        cfg.runtime = runtime;
        let set = api::generate(&cfg);

        assert_eq!(set.manifest["remoteUser"], user);
        assert!(set.dockerfile.contains(&format!("USER {}", user)));
        assert!(set
            .dockerfile
            .contains(&format!("{} ALL=(root) NOPASSWD:", user)));
    }
}

#[test]
fn test_recipe_and_firewall_agree_on_script_path() {
    let set = api::generate(&config());
    assert!(set
        .dockerfile
        .contains("COPY init-firewall.sh /usr/local/bin/init-firewall.sh"));
    assert_eq!(
        set.manifest["postCreateCommand"],
        "sudo /usr/local/bin/init-firewall.sh"
    );
}

#[test]
fn test_firewall_script_covers_all_resolved_domains() {
    let mut cfg = config();
    cfg.runtime = Runtime::Python;
    cfg.assistant_mode = AssistantMode::Local;
    let set = api::generate(&cfg);
    let script = set.firewall_script.unwrap();

    for domain in [
        "api.github.com",
        "github.com",
        "pypi.org",
        "files.pythonhosted.org",
        "api.anthropic.com",
        "statsig.anthropic.com",
        "statsig.com",
        "sentry.io",
    ] {
        assert!(script.contains(&format!("\"{}\"", domain)), "missing {domain}");
    }
    assert!(!script.contains("registry.npmjs.org"));
}
