//! Artifact compilers: pure functions from configuration and resolved policy
//! to artifact text. No compiler depends on another's output; they share only
//! the [`crate::policy::GenerationPolicy`] resolved once per run.

pub mod firewall;
pub mod manifest;
pub mod recipe;

/// Filename the firewall script is written and copied into the image as.
pub const FIREWALL_SCRIPT_NAME: &str = "init-firewall.sh";

/// Absolute path of the firewall script inside the built container.
pub const FIREWALL_SCRIPT_PATH: &str = "/usr/local/bin/init-firewall.sh";
