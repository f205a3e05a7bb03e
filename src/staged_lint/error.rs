use thiserror::Error;

use crate::config::ConfigError;

/// Hard failures of a staged-lint run.
///
/// A linter exiting non-zero is not one of these; that is a normal outcome
/// reported through [`super::LintOutcome`].
#[derive(Debug, Error)]
pub enum LintError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to restage {}: {message}", files.join(", "))]
    Restage { files: Vec<String>, message: String },
}
