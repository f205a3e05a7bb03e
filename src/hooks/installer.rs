use anyhow::Result;
use std::path::{Path, PathBuf};

use super::GitHook;
use super::script::{HOOK_RUNNER, hook_command, render_hook_script};
use crate::cli::Output;
use crate::config::{ConfigError, HookAction, HooksConfig};
use crate::git::GitRepo;

/// Set to `1` or `true` to make `install` a no-op (CI, containers).
pub const SKIP_INSTALL_ENV: &str = "SKIP_INSTALL_GIT_HOOKS";

fn is_truthy(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

pub fn install_skipped() -> bool {
    std::env::var(SKIP_INSTALL_ENV).is_ok_and(|value| is_truthy(&value))
}

/// Hooks written and removed by one install.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub installed: Vec<GitHook>,
    pub removed: Vec<GitHook>,
}

pub struct HookInstaller {
    repo: GitRepo,
    output: Output,
    config_path: Option<PathBuf>,
}

impl HookInstaller {
    pub fn new(repo: GitRepo, output: Output) -> Self {
        Self {
            repo,
            output,
            config_path: None,
        }
    }

    /// Config file staged-lint hooks should load instead of the discovered one.
    pub fn with_config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    /// Find the repository containing `project_root`. Outside a repository
    /// there is nothing to install into.
    pub fn discover(project_root: &Path, output: Output) -> Option<Self> {
        match GitRepo::discover(project_root) {
            Ok(repo) => Some(Self::new(repo, output)),
            Err(e) => {
                tracing::debug!("{e:#}");
                None
            }
        }
    }

    pub fn repo(&self) -> &GitRepo {
        &self.repo
    }

    /// Write a script for every configured hook and remove the scripts of
    /// unconfigured hooks that `preserveUnused` does not protect.
    ///
    /// The configuration is validated before any file is touched.
    pub fn install(&self, config: &HooksConfig) -> Result<InstallReport> {
        if config.hooks().next().is_none() {
            return Err(ConfigError::NoHooks.into());
        }
        config.validate()?;

        let mut report = InstallReport::default();

        for &hook in GitHook::ALL {
            match config.hook(hook) {
                Some(entry) => {
                    let script = render_hook_script(&hook_command(
                        hook,
                        &entry.action,
                        self.config_path.as_deref(),
                    ));
                    let path = self.repo.install_hook(hook, &script)?;
                    self.output
                        .verbose(&format!("Installed {hook} at {}", path.display()));
                    report.installed.push(hook);
                }
                None if config.preserve_unused.preserves(hook) => {
                    tracing::trace!("preserving {hook}");
                }
                None => {
                    if self.repo.remove_hook(hook)? {
                        self.output.verbose(&format!("Removed unused {hook}"));
                        report.removed.push(hook);
                    }
                }
            }
        }

        let uses_runner = config
            .hooks()
            .any(|(_, entry)| matches!(entry.action, HookAction::StagedLint(_)));
        if uses_runner && which::which(HOOK_RUNNER).is_err() {
            self.output.warning(&format!(
                "`{HOOK_RUNNER}` is not on PATH; staged-lint hooks will fail until it is installed"
            ));
        }

        Ok(report)
    }

    /// Remove every hook script this tool could have installed.
    pub fn uninstall(&self) -> Result<Vec<GitHook>> {
        let mut removed = Vec::new();
        for &hook in GitHook::ALL {
            if self.repo.remove_hook(hook)? {
                self.output.verbose(&format!("Removed {hook}"));
                removed.push(hook);
            }
        }
        Ok(removed)
    }
}
