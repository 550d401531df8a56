//! Integration tests for configuration loading and persistence

use devforge::config::{
    AssistantMode, ConfigLoader, DevcontainerConfig, NodePackageManager, Runtime,
};
use devforge::error::GenerateError;
use tempfile::TempDir;

#[test]
fn test_config_save_load_round_trip() {
    let temp_dir = TempDir::new().unwrap();

    let config = DevcontainerConfig {
        runtime: Runtime::Node(NodePackageManager::Bun),
        runtime_version: "20".to_string(),
        timezone: "Europe/Berlin".to_string(),
        ports: vec![3000, 5432],
        enable_firewall: true,
        assistant_mode: AssistantMode::Local,
        extensions: vec!["dbaeumer.vscode-eslint".to_string()],
    };

    let path = ConfigLoader::save(&config, temp_dir.path()).unwrap();
    assert!(path.ends_with("devforge.toml"));

    let loaded = ConfigLoader::load(temp_dir.path()).unwrap();
    assert_eq!(loaded.runtime, Runtime::Node(NodePackageManager::Bun));
    assert_eq!(loaded.timezone, "Europe/Berlin");
    assert_eq!(loaded.ports, vec![3000, 5432]);
    assert!(loaded.enable_firewall);
    assert_eq!(loaded.assistant_mode, AssistantMode::Local);
    assert_eq!(loaded.extensions, vec!["dbaeumer.vscode-eslint"]);
}

#[test]
fn test_missing_config_reports_path_and_hint() {
    let temp_dir = TempDir::new().unwrap();
    let err = ConfigLoader::load(temp_dir.path()).unwrap_err();

    match err {
        GenerateError::ConfigNotFound(path) => {
            assert!(path.ends_with("devforge.toml"));
        }
        other => panic!("expected ConfigNotFound, got {other}"),
    }
    let message = ConfigLoader::load(temp_dir.path()).unwrap_err().to_string();
    assert!(message.contains("devforge init"));
}

#[test]
fn test_config_file_parses_kebab_case_enums() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("devforge.toml");

    std::fs::write(
        &config_file,
        r#"
runtime = "python"
runtime_version = "3.12"
timezone = "UTC"
ports = [8000]
enable_firewall = false
assistant_mode = "fresh"
extensions = ["ms-python.python"]
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    assert_eq!(config.runtime, Runtime::Python);
    assert_eq!(config.assistant_mode, AssistantMode::Fresh);
    assert!(config.validate().is_ok());
}

#[test]
fn test_unknown_runtime_rejected_at_parse() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("devforge.toml");

    std::fs::write(
        &config_file,
        r#"
runtime = "ruby"
runtime_version = "3.3"
"#,
    )
    .unwrap();

    let err = ConfigLoader::load_from_file(&config_file).unwrap_err();
    assert!(err.to_string().contains("Unknown runtime"));
}
