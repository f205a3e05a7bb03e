//! # git-hooks - declarative git hooks with staged-file linting
//!
//! Hooks are declared in a configuration file (`git-hooks.config.{json,toml,yaml}`
//! or a `"git-hooks"` entry in `package.json`) and installed as small shell
//! scripts. The `pre-commit` hook can carry a staged-lint map that runs
//! linters only against the staged files each glob matches:
//!
//! ```json
//! {
//!   "pre-commit": {
//!     "staged-lint": {
//!       "**/*.{js,ts}": ["eslint --fix", "prettier --write"],
//!       "**/*.rs": "rustfmt --edition 2024"
//!     }
//!   },
//!   "commit-msg": "gitlint --msg-filename \"$1\""
//! }
//! ```
//!
//! Files rewritten by a linter are restaged and the map is run again with
//! `--fix` flags stripped, so a fixer that leaves violations behind still
//! blocks the commit.
//!
//! ## Quick Start
//!
//! ```bash
//! # Install hooks from the discovered configuration
//! git-hooks
//!
//! # What the installed pre-commit hook runs
//! git-hooks run-staged-lint pre-commit
//! ```

pub mod cli;
pub mod config;
pub mod git;
pub mod hooks;
pub mod shared;
pub mod staged_lint;

pub use cli::{Cli, Output};
pub use config::HooksConfig;
pub use staged_lint::run_staged_lint;

/// Result type alias for CLI-level operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
