//! Staged-lint: run linters on the files staged for commit
//!
//! A run resolves the pattern map for a hook, lists staged files, runs every
//! matching pattern's commands in order and, when commands rewrote files,
//! restages them and runs the whole map once more with fix flags stripped:
//!
//! ```text
//! resolve config ─► list staged ─► lint pass ─► changed? ─► restage ─► validation pass
//!       │                │             │            │
//!    no map          nothing       failure       unchanged
//!       ▼                ▼             ▼            ▼
//!     error           success       failure      success
//! ```
//!
//! Everything collapses to a boolean in [`run_staged_lint`]; the caller turns
//! `false` into a non-zero exit status.

pub mod command;
pub mod dispatcher;
mod error;
pub mod restage;

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::Output;
use crate::config::{ConfigError, HookAction, HooksConfig, PatternMap};
use crate::git::staged::list_staged_files;
use crate::hooks::GitHook;

pub use dispatcher::{CommandFailure, DispatchReport, FailureCause, PassKind, PatternDispatcher};
pub use error::LintError;
pub use restage::RestageCoordinator;

/// Per-run settings, threaded explicitly into every component.
#[derive(Debug, Clone)]
pub struct LintOptions {
    pub project_root: PathBuf,
    pub verbose: bool,
    pub quiet: bool,
    pub auto_restage: bool,
    pub timeout: Option<Duration>,
}

impl LintOptions {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            verbose: false,
            quiet: false,
            auto_restage: true,
            timeout: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintOutcome {
    NothingStaged,
    Passed,
    CommandFailed(CommandFailure),
    /// The lint pass passed and its fixes were restaged, but the
    /// check-only pass still failed.
    ValidationFailed(CommandFailure),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintRunResult {
    pub outcome: LintOutcome,
    /// Commands executed across both passes.
    pub commands_run: usize,
    /// Files the lint pass rewrote.
    pub modified: Vec<String>,
    pub restaged: bool,
}

impl LintRunResult {
    fn finished(outcome: LintOutcome, commands_run: usize) -> Self {
        Self {
            outcome,
            commands_run,
            modified: Vec::new(),
            restaged: false,
        }
    }

    pub fn success(&self) -> bool {
        matches!(self.outcome, LintOutcome::NothingStaged | LintOutcome::Passed)
    }
}

pub struct StagedLintRunner {
    options: LintOptions,
    output: Output,
}

impl StagedLintRunner {
    pub fn new(options: LintOptions) -> Self {
        let output = Output::new(options.verbose, options.quiet);
        Self { options, output }
    }

    /// Lint the staged files through one pattern map.
    pub async fn process(&self, patterns: &PatternMap) -> Result<LintRunResult, LintError> {
        let root = &self.options.project_root;

        let staged = list_staged_files(root).await;
        if staged.is_empty() {
            self.output.verbose("No staged files, nothing to lint");
            return Ok(LintRunResult::finished(LintOutcome::NothingStaged, 0));
        }
        self.output
            .verbose(&format!("Found {} staged file(s)", staged.len()));

        let dispatcher = PatternDispatcher::new(root.clone(), self.output)
            .with_timeout(self.options.timeout);
        let coordinator = RestageCoordinator::new(root.clone(), self.output);

        let snapshot = coordinator.snapshot(&staged).await;
        let lint = dispatcher.run(patterns, &staged, PassKind::Lint).await;
        let modified = coordinator.modified_files(&snapshot).await;
        let mut commands_run = lint.commands_run;

        if !self.options.auto_restage {
            if !modified.is_empty() {
                coordinator.warn_not_restaged(&modified);
            }
            let outcome = match lint.failure {
                Some(failure) => LintOutcome::CommandFailed(failure),
                None => LintOutcome::Passed,
            };
            return Ok(LintRunResult {
                outcome,
                commands_run,
                modified,
                restaged: false,
            });
        }

        if let Some(failure) = lint.failure {
            return Ok(LintRunResult {
                outcome: LintOutcome::CommandFailed(failure),
                commands_run,
                modified,
                restaged: false,
            });
        }

        if modified.is_empty() {
            return Ok(LintRunResult::finished(LintOutcome::Passed, commands_run));
        }

        coordinator.restage(&modified).await?;

        self.output.verbose("Re-running lint commands to validate fixes");
        let restaged_files = list_staged_files(root).await;
        let validation = dispatcher
            .run(patterns, &restaged_files, PassKind::Validate)
            .await;
        commands_run += validation.commands_run;

        let outcome = match validation.failure {
            Some(failure) => LintOutcome::ValidationFailed(failure),
            None => LintOutcome::Passed,
        };
        Ok(LintRunResult {
            outcome,
            commands_run,
            modified,
            restaged: true,
        })
    }
}

/// Pick the pattern map and auto-restage setting for a hook.
///
/// The hook's own staged-lint map wins over the global one. Auto-restage
/// precedence: `override_restage`, then the hook, then the global setting,
/// then `true`.
pub fn resolve<'a>(
    hook_name: &str,
    config: &'a HooksConfig,
    override_restage: Option<bool>,
) -> Result<(&'a PatternMap, bool), ConfigError> {
    let entry = GitHook::from_name(hook_name).and_then(|hook| config.hook(hook));

    let hook_patterns = entry.and_then(|entry| match &entry.action {
        HookAction::StagedLint(patterns) => Some(patterns),
        HookAction::Command(_) => None,
    });

    let patterns = hook_patterns
        .or(config.staged_lint.as_ref())
        .ok_or_else(|| ConfigError::NoStagedLint(hook_name.to_string()))?;

    let auto_restage = override_restage
        .or_else(|| entry.and_then(|entry| entry.auto_restage))
        .or(config.auto_restage)
        .unwrap_or(true);

    Ok((patterns, auto_restage))
}

fn report(output: &Output, result: &LintRunResult) {
    match &result.outcome {
        LintOutcome::NothingStaged => {}
        LintOutcome::Passed => {
            if result.commands_run > 0 {
                output.success(&format!(
                    "Staged lint passed ({} command(s))",
                    result.commands_run
                ));
            }
        }
        LintOutcome::CommandFailed(failure) => {
            output.error(&format!("Staged lint failed: {failure}"));
            output.captured("stdout:", &failure.stdout);
            output.captured("stderr:", &failure.stderr);
        }
        LintOutcome::ValidationFailed(failure) => {
            output.error(&format!(
                "Fixes were applied and restaged, but validation still fails: {failure}"
            ));
            output.captured("stdout:", &failure.stdout);
            output.captured("stderr:", &failure.stderr);
        }
    }
}

/// Run staged-lint for a hook with explicit output settings.
pub async fn run_with_output(
    hook_name: &str,
    config: &HooksConfig,
    project_root: &Path,
    output: Output,
    auto_restage: Option<bool>,
) -> bool {
    output.verbose(&format!("Running staged lint for hook: {hook_name}"));

    let (patterns, auto_restage) = match resolve(hook_name, config, auto_restage) {
        Ok(resolved) => resolved,
        Err(e) => {
            output.error(&e.to_string());
            return false;
        }
    };

    let runner = StagedLintRunner::new(LintOptions {
        project_root: project_root.to_path_buf(),
        verbose: output.is_verbose(),
        quiet: output.is_quiet(),
        auto_restage,
        timeout: config.timeout.map(Duration::from_secs),
    });

    match runner.process(patterns).await {
        Ok(result) => {
            report(&output, &result);
            result.success()
        }
        Err(e) => {
            output.error(&e.to_string());
            false
        }
    }
}

/// Run staged-lint for a hook. Never fails; returns whether the commit may proceed.
pub async fn run_staged_lint(
    hook_name: &str,
    config: &HooksConfig,
    project_root: &Path,
    verbose: bool,
    auto_restage: Option<bool>,
) -> bool {
    let output = Output::new(verbose || config.verbose, false);
    run_with_output(hook_name, config, project_root, output, auto_restage).await
}
