//! Error types for the devforge artifact generation system.

use thiserror::Error;

/// Errors surfaced by configuration loading and artifact writing.
///
/// The compilers themselves are total over valid configurations and never
/// fail; everything here belongs to the surrounding orchestration.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Configuration not found at {}. Run `devforge init` to create one.", .0.display())]
    ConfigNotFound(std::path::PathBuf),

    #[error("Invalid configuration: {0}")]
    ValidationFailed(String),

    #[error("Input error: {0}")]
    InputError(String),

    #[error("Artifact I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
