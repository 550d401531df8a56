//! Devforge: Development Container Artifact Generation
//!
//! Turns a small validated configuration into a coherent set of development
//! container artifacts: an editor manifest, a container build recipe, and an
//! optional egress-lockdown firewall script.

pub mod api;
pub mod cli;
pub mod compile;
pub mod config;
pub mod error;
pub mod logging;
pub mod policy;
