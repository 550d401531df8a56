//! Generation Policy
//!
//! Decisions shared by all three artifact compilers: the privileged user the
//! container runs as, and the ordered egress domain allow-list. Both are
//! derived here exactly once per generation run and passed to the compilers
//! as explicit inputs, so the artifacts cannot drift out of sync on the user
//! name or the domain set.

use crate::config::{AssistantMode, DevcontainerConfig, Runtime};

/// Privileged user in node-family containers (ships with the base image).
pub const NODE_USER: &str = "node";

/// Privileged user in python containers (created by the recipe; the base
/// image has no non-root user).
pub const PYTHON_USER: &str = "vscode";

/// Domains allowed for every configuration: the source-hosting service's API
/// and web hosts.
pub const BASE_DOMAINS: [&str; 2] = ["api.github.com", "github.com"];

/// Package registry domain for the node family.
pub const NPM_REGISTRY_DOMAIN: &str = "registry.npmjs.org";

/// PyPI domains for the python runtime.
pub const PYPI_DOMAINS: [&str; 2] = ["pypi.org", "files.pythonhosted.org"];

/// Assistant-vendor domains: API endpoint, two telemetry endpoints, and the
/// error-reporting endpoint. Identical for `local` and `fresh` modes.
pub const ASSISTANT_DOMAINS: [&str; 4] = [
    "api.anthropic.com",
    "statsig.anthropic.com",
    "statsig.com",
    "sentry.io",
];

/// Shared decisions for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPolicy {
    /// Non-root user name used consistently across all three artifacts.
    pub username: &'static str,
    /// Ordered egress allow-list, duplicate-free by construction.
    pub domains: Vec<&'static str>,
}

impl GenerationPolicy {
    /// Resolve the policy for a configuration.
    pub fn resolve(config: &DevcontainerConfig) -> Self {
        GenerationPolicy {
            username: resolve_user(config.runtime),
            domains: resolve_domains(config),
        }
    }

    /// Home directory of the privileged user, used for credential mounts and
    /// shell configuration paths.
    pub fn home_dir(&self) -> String {
        format!("/home/{}", self.username)
    }
}

/// Map the runtime family to the container's non-root user.
pub fn resolve_user(runtime: Runtime) -> &'static str {
    match runtime {
        Runtime::Node(_) => NODE_USER,
        Runtime::Python => PYTHON_USER,
    }
}

/// Derive the ordered egress domain allow-list.
///
/// Each append is guarded by a mutually exclusive or monotonic condition, so
/// no domain can appear twice: the runtime branches cannot both fire, and the
/// assistant block appends domains disjoint from both.
pub fn resolve_domains(config: &DevcontainerConfig) -> Vec<&'static str> {
    let mut domains: Vec<&'static str> = BASE_DOMAINS.to_vec();

    match config.runtime {
        Runtime::Node(_) => domains.push(NPM_REGISTRY_DOMAIN),
        Runtime::Python => domains.extend(PYPI_DOMAINS),
    }

    if config.assistant_mode != AssistantMode::None {
        domains.extend(ASSISTANT_DOMAINS);
    }

    domains
}
