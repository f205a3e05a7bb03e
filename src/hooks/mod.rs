//! Git hooks management module
//!
//! Installs one executable script per configured hook into the repository's
//! hooks directory and removes the scripts of hooks that are no longer
//! configured.
//!
//! A hook configured with a plain command runs that command:
//!
//! ```yaml
//! commit-msg: "gitlint --msg-filename $1"
//! ```
//!
//! A `pre-commit` hook with a staged-lint map calls back into this binary:
//!
//! ```yaml
//! pre-commit:
//!   staged-lint:
//!     "**/*.rs": "rustfmt --check"
//! ```
//!
//! installs a script ending in `git-hooks run-staged-lint pre-commit`.
//!
//! Every script starts with a preamble: `SKIP_GIT_HOOKS=1` skips the hook,
//! and `GIT_HOOKS_RC` names a shell file to source first.

pub mod installer;
mod names;
pub mod script;

pub use installer::{HookInstaller, InstallReport};
pub use names::GitHook;
