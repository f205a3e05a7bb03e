//! Index access for staged-lint: listing staged files, reading their staged
//! blobs and adding files back to the index.
//!
//! Everything here shells out to `git` so that the index is read and written
//! exactly the way the surrounding `git commit` sees it.

use anyhow::{Context, Result, bail};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

fn git_available() -> bool {
    which::which("git").is_ok()
}

fn git(project_root: &Path) -> Command {
    let mut cmd = Command::new("git");
    cmd.current_dir(project_root).stdin(Stdio::null());
    cmd
}

/// Staged paths (added, copied, modified or renamed), relative to the
/// repository root, in the order git reports them.
///
/// Any failure (no `git`, not a repository) yields an empty list: there is
/// nothing to lint.
pub async fn list_staged_files(project_root: &Path) -> Vec<String> {
    if !git_available() {
        tracing::debug!("git executable not found; treating staged set as empty");
        return Vec::new();
    }

    let output = git(project_root)
        .args(["diff", "--cached", "--name-only", "--diff-filter=ACMR", "-z"])
        .output()
        .await;

    match output {
        Ok(output) if output.status.success() => output
            .stdout
            .split(|byte| *byte == 0)
            .filter(|path| !path.is_empty())
            .filter_map(|path| match std::str::from_utf8(path) {
                Ok(path) => Some(path.to_string()),
                Err(_) => {
                    tracing::debug!(
                        "skipping non-UTF-8 staged path {}",
                        String::from_utf8_lossy(path)
                    );
                    None
                }
            })
            .collect(),
        Ok(output) => {
            tracing::debug!(
                "git diff --cached failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
            Vec::new()
        }
        Err(e) => {
            tracing::debug!("failed to run git diff --cached: {e}");
            Vec::new()
        }
    }
}

/// Pre-run content of staged files, in staged order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentSnapshot {
    entries: Vec<(String, Vec<u8>)>,
}

impl ContentSnapshot {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries
            .iter()
            .map(|(file, content)| (file.as_str(), content.as_slice()))
    }
}

async fn staged_blob(project_root: &Path, file: &str) -> Option<Vec<u8>> {
    let output = git(project_root)
        .arg("show")
        .arg(format!(":{file}"))
        .output()
        .await
        .ok()?;
    output.status.success().then_some(output.stdout)
}

/// Capture the staged (index) content of each file.
///
/// Files without a readable index blob fall back to their working-tree
/// content; files that cannot be read either way are left out, which means
/// they are never reported as modified.
pub async fn snapshot_content(project_root: &Path, files: &[String]) -> ContentSnapshot {
    let mut entries = Vec::with_capacity(files.len());

    for file in files {
        let content = match staged_blob(project_root, file).await {
            Some(content) => Some(content),
            None => tokio::fs::read(project_root.join(file)).await.ok(),
        };

        match content {
            Some(content) => entries.push((file.clone(), content)),
            None => tracing::debug!("no snapshot for {file}; skipping change detection"),
        }
    }

    ContentSnapshot { entries }
}

/// Add files to the index in one `git add` invocation.
pub async fn stage_files(project_root: &Path, files: &[String]) -> Result<()> {
    if files.is_empty() {
        return Ok(());
    }

    let output = git(project_root)
        .arg("add")
        .arg("--")
        .args(files)
        .output()
        .await
        .context("Failed to run git add")?;

    if !output.status.success() {
        bail!(
            "git add exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    tracing::debug!("staged {} file(s)", files.len());
    Ok(())
}
