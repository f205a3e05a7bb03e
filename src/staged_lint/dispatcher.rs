//! Runs pattern-map entries against the staged files they match.

use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use super::command::{render, strip_fix_flags};
use crate::cli::Output;
use crate::config::PatternMap;
use crate::shared::glob::PatternFilter;

/// Which pass over the pattern map is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Commands run as configured.
    Lint,
    /// Commands run with fix flags stripped, after restaging.
    Validate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureCause {
    /// Non-zero exit; `None` when the process was killed by a signal.
    Exit(Option<i32>),
    Spawn(String),
    TimedOut(Duration),
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCause::Exit(Some(code)) => write!(f, "exit code {code}"),
            FailureCause::Exit(None) => f.write_str("terminated by signal"),
            FailureCause::Spawn(message) => write!(f, "could not be started: {message}"),
            FailureCause::TimedOut(limit) => write!(f, "timed out after {}s", limit.as_secs()),
        }
    }
}

/// The command that stopped a pass, with what it printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFailure {
    pub pattern: String,
    /// The command line as executed, files included.
    pub command: String,
    pub files: Vec<String>,
    pub cause: FailureCause,
    pub stdout: String,
    pub stderr: String,
}

impl fmt::Display for CommandFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}` failed for {} ({})",
            self.command, self.pattern, self.cause
        )
    }
}

/// What a pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub commands_run: usize,
    pub failure: Option<CommandFailure>,
}

impl DispatchReport {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

pub struct PatternDispatcher {
    project_root: PathBuf,
    output: Output,
    timeout: Option<Duration>,
}

struct Captured {
    stdout: String,
    stderr: String,
}

fn shell(line: &str) -> Command {
    #[cfg(windows)]
    {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(line);
        cmd
    }
    #[cfg(not(windows))]
    {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(line);
        cmd
    }
}

impl PatternDispatcher {
    pub fn new(project_root: impl Into<PathBuf>, output: Output) -> Self {
        Self {
            project_root: project_root.into(),
            output,
            timeout: None,
        }
    }

    /// Kill any single command that runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run every entry in map order, stopping at the first failing command.
    ///
    /// Entries that match no staged file are skipped without running anything.
    pub async fn run(&self, patterns: &PatternMap, staged: &[String], pass: PassKind) -> DispatchReport {
        let mut report = DispatchReport::default();

        for entry in patterns.iter() {
            let matched = PatternFilter::new(&entry.pattern).filter(staged);
            if matched.is_empty() {
                self.output
                    .verbose(&format!("No staged files match {}, skipping", entry.pattern));
                continue;
            }

            self.output.verbose(&format!(
                "{} matched {} file(s)",
                entry.pattern,
                matched.len()
            ));

            for command in entry.commands.commands() {
                let command = match pass {
                    PassKind::Lint => command.clone(),
                    PassKind::Validate => strip_fix_flags(command),
                };
                let line = render(&command, &matched);

                self.output.verbose_step("❯", &line);
                report.commands_run += 1;

                if let Err((cause, captured)) = self.execute(&line).await {
                    report.failure = Some(CommandFailure {
                        pattern: entry.pattern.clone(),
                        command: line,
                        files: matched,
                        cause,
                        stdout: captured.stdout,
                        stderr: captured.stderr,
                    });
                    return report;
                }
            }
        }

        report
    }

    async fn execute(&self, line: &str) -> Result<(), (FailureCause, Captured)> {
        tracing::debug!("running `{line}` in {}", self.project_root.display());

        let empty = || Captured {
            stdout: String::new(),
            stderr: String::new(),
        };

        let child = shell(line)
            .current_dir(&self.project_root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| (FailureCause::Spawn(e.to_string()), empty()))?;

        let waited = child.wait_with_output();
        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, waited).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::debug!("`{line}` exceeded {limit:?}; killed");
                    return Err((FailureCause::TimedOut(limit), empty()));
                }
            },
            None => waited.await,
        };
        let output = result.map_err(|e| (FailureCause::Spawn(e.to_string()), empty()))?;

        let captured = Captured {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if output.status.success() {
            if self.output.is_verbose() && !captured.stdout.trim().is_empty() {
                for text in captured.stdout.trim_end().lines() {
                    self.output.verbose(text);
                }
            }
            Ok(())
        } else {
            tracing::debug!("`{line}` exited with {}", output.status);
            Err((FailureCause::Exit(output.status.code()), captured))
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::config::CommandSpec;
    use tempfile::TempDir;

    fn staged(list: &[&str]) -> Vec<String> {
        list.iter().map(|f| f.to_string()).collect()
    }

    fn dispatcher(dir: &TempDir) -> PatternDispatcher {
        PatternDispatcher::new(dir.path(), Output::default())
    }

    #[tokio::test]
    async fn test_unmatched_entries_never_run() {
        let dir = TempDir::new().unwrap();
        let patterns: PatternMap = [
            ("**/*.py", CommandSpec::from("touch python-ran")),
            ("**/*.js", CommandSpec::from("touch js-ran")),
        ]
        .into_iter()
        .collect();

        let report = dispatcher(&dir)
            .run(&patterns, &staged(&["app.js"]), PassKind::Lint)
            .await;

        assert!(report.passed());
        assert_eq!(report.commands_run, 1);
        assert!(!dir.path().join("python-ran").exists());
        assert!(dir.path().join("js-ran").exists());
    }

    #[tokio::test]
    async fn test_first_failure_stops_the_pass() {
        let dir = TempDir::new().unwrap();
        let patterns: PatternMap = [
            ("*.js", CommandSpec::from(vec!["echo checking {files} >&2; exit 3", "touch second-command"])),
            ("*.js*", CommandSpec::from("touch second-entry")),
        ]
        .into_iter()
        .collect();

        let report = dispatcher(&dir)
            .run(&patterns, &staged(&["a.js"]), PassKind::Lint)
            .await;

        let failure = report.failure.unwrap();
        assert_eq!(failure.cause, FailureCause::Exit(Some(3)));
        assert_eq!(failure.pattern, "*.js");
        assert_eq!(failure.files, staged(&["a.js"]));
        assert_eq!(failure.stderr.trim(), "checking a.js");
        assert_eq!(report.commands_run, 1);
        assert!(!dir.path().join("second-command").exists());
        assert!(!dir.path().join("second-entry").exists());
    }

    #[tokio::test]
    async fn test_files_are_passed_to_commands() {
        let dir = TempDir::new().unwrap();
        let patterns: PatternMap = [
            ("*.md", CommandSpec::from("printf '%s\\n' {files} > seen.txt")),
        ]
        .into_iter()
        .collect();

        let report = dispatcher(&dir)
            .run(&patterns, &staged(&["b.md", "x.rs", "a.md"]), PassKind::Lint)
            .await;

        assert!(report.passed());
        let seen = std::fs::read_to_string(dir.path().join("seen.txt")).unwrap();
        assert_eq!(seen, "b.md\na.md\n");
    }

    #[tokio::test]
    async fn test_validation_pass_strips_fix_flags() {
        let dir = TempDir::new().unwrap();
        let patterns: PatternMap = [("*.js", CommandSpec::from("echo --fix > flags.txt; true"))]
            .into_iter()
            .collect();

        dispatcher(&dir)
            .run(&patterns, &staged(&["a.js"]), PassKind::Validate)
            .await;

        let flags = std::fs::read_to_string(dir.path().join("flags.txt")).unwrap();
        assert!(!flags.contains("--fix"));
    }

    #[tokio::test]
    async fn test_timeout_kills_long_commands() {
        let dir = TempDir::new().unwrap();
        let patterns: PatternMap = [("*.js", CommandSpec::from("sleep 5; true"))]
            .into_iter()
            .collect();

        let report = dispatcher(&dir)
            .with_timeout(Some(Duration::from_millis(200)))
            .run(&patterns, &staged(&["a.js"]), PassKind::Lint)
            .await;

        assert!(matches!(
            report.failure.map(|failure| failure.cause),
            Some(FailureCause::TimedOut(_))
        ));
    }
}
