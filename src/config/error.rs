use std::path::PathBuf;

use thiserror::Error;

use super::loader::ConfigFormat;
use crate::hooks::GitHook;

/// Everything that can go wrong while locating, parsing, or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "config was not found; add .git-hooks.config.{{json,toml,yaml,yml}}, \
         git-hooks.config.{{json,toml,yaml,yml}} or a \"git-hooks\" entry in package.json"
    )]
    NotFound,

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {} as {format}: {message}", path.display())]
    Parse {
        path: PathBuf,
        format: ConfigFormat,
        message: String,
    },

    #[error("invalid value for `{key}`: {message}")]
    InvalidValue { key: String, message: String },

    #[error("`{0}` is not a git hook or a known option")]
    UnknownKey(String),

    #[error("command for {0} is not set")]
    EmptyCommand(GitHook),

    #[error("staged-lint is only supported on the pre-commit hook, but {0} configures it")]
    StagedLintNotAllowed(GitHook),

    #[error("configuration does not define any git hooks")]
    NoHooks,

    #[error("no staged-lint configuration found for hook {0}")]
    NoStagedLint(String),

    #[error("invalid environment override: {0}")]
    Env(String),
}

impl ConfigError {
    pub(crate) fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}
