#![allow(dead_code)]

use anyhow::{Result, bail};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// A throwaway git repository driven through the `git` CLI.
pub struct TestRepo {
    pub temp_dir: TempDir,
}

impl TestRepo {
    pub fn new() -> Result<Self> {
        let repo = Self {
            temp_dir: TempDir::new()?,
        };
        repo.git(&["init", "-q"])?;
        repo.git(&["config", "user.email", "test@example.com"])?;
        repo.git(&["config", "user.name", "Test User"])?;
        repo.git(&["config", "commit.gpgsign", "false"])?;
        Ok(repo)
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn git(&self, args: &[&str]) -> Result<Output> {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.path())
            .output()?;
        if !output.status.success() {
            bail!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        Ok(output)
    }

    pub fn write(&self, file: &str, content: &str) -> Result<()> {
        let path = self.path().join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    pub fn stage(&self, files: &[&str]) -> Result<()> {
        let mut args = vec!["add", "--"];
        args.extend_from_slice(files);
        self.git(&args)?;
        Ok(())
    }

    pub fn write_and_stage(&self, file: &str, content: &str) -> Result<()> {
        self.write(file, content)?;
        self.stage(&[file])
    }

    pub fn read(&self, file: &str) -> Result<String> {
        Ok(fs::read_to_string(self.path().join(file))?)
    }

    pub fn exists(&self, file: &str) -> bool {
        self.path().join(file).exists()
    }

    /// Content of `file` as recorded in the index.
    pub fn staged_content(&self, file: &str) -> Result<String> {
        let output = self.git(&["show", &format!(":{file}")])?;
        Ok(String::from_utf8(output.stdout)?)
    }

    /// Files with working-tree changes that are not staged.
    pub fn unstaged_files(&self) -> Result<Vec<String>> {
        let output = self.git(&["diff", "--name-only"])?;
        Ok(String::from_utf8(output.stdout)?
            .lines()
            .map(str::to_string)
            .collect())
    }

    pub fn hook_path(&self, hook: &str) -> std::path::PathBuf {
        self.path().join(".git").join("hooks").join(hook)
    }

    /// A fixer that rewrites its file arguments when given `--fix` and
    /// otherwise always reports a violation.
    pub fn write_stubborn_fixer(&self) -> Result<()> {
        self.write(
            "fixer.sh",
            r#"#!/bin/sh
if [ "$1" = "--fix" ]; then
    shift
    for f in "$@"; do printf 'fixed\n' > "$f"; done
    exit 0
fi
echo "violations remain in $*" >&2
exit 1
"#,
        )
    }
}
