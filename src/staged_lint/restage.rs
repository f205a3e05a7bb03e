//! Detecting and restaging files that lint commands rewrote.

use std::path::PathBuf;

use super::LintError;
use crate::cli::Output;
use crate::git::staged::{self, ContentSnapshot};

pub struct RestageCoordinator {
    project_root: PathBuf,
    output: Output,
}

impl RestageCoordinator {
    pub fn new(project_root: impl Into<PathBuf>, output: Output) -> Self {
        Self {
            project_root: project_root.into(),
            output,
        }
    }

    /// Capture staged content before any command runs.
    pub async fn snapshot(&self, files: &[String]) -> ContentSnapshot {
        staged::snapshot_content(&self.project_root, files).await
    }

    /// Files whose working-tree bytes now differ from the snapshot.
    ///
    /// Only the working tree is compared; a command that edits the index
    /// directly is not noticed.
    pub async fn modified_files(&self, snapshot: &ContentSnapshot) -> Vec<String> {
        let mut modified = Vec::new();

        for (file, before) in snapshot.iter() {
            match tokio::fs::read(self.project_root.join(file)).await {
                Ok(after) if after != before => modified.push(file.to_string()),
                Ok(_) => {}
                Err(e) => tracing::debug!("cannot re-read {file}: {e}"),
            }
        }

        modified
    }

    /// Add every modified file back to the index in one batch.
    pub async fn restage(&self, files: &[String]) -> Result<(), LintError> {
        staged::stage_files(&self.project_root, files)
            .await
            .map_err(|e| LintError::Restage {
                files: files.to_vec(),
                message: format!("{e:#}"),
            })?;

        self.output
            .verbose(&format!("Auto-restaged {} modified file(s):", files.len()));
        if self.output.is_verbose() {
            for file in files {
                self.output.list_item(file);
            }
        }
        Ok(())
    }

    pub fn warn_not_restaged(&self, files: &[String]) {
        self.output.warning(&format!(
            "{} file(s) were modified by lint commands but auto-restage is disabled:",
            files.len()
        ));
        for file in files {
            self.output.list_item(file);
        }
        self.output
            .warning("Stage these files manually and commit again.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_only_changed_bytes_count_as_modified() {
        let dir = TempDir::new().unwrap();
        for (name, content) in [("same.txt", "keep"), ("edited.txt", "before"), ("gone.txt", "x")] {
            std::fs::write(dir.path().join(name), content).unwrap();
        }

        let coordinator = RestageCoordinator::new(dir.path(), Output::default());
        let files: Vec<String> = ["same.txt", "edited.txt", "gone.txt"]
            .iter()
            .map(|f| f.to_string())
            .collect();
        let snapshot = coordinator.snapshot(&files).await;
        assert_eq!(snapshot.iter().count(), 3);

        std::fs::write(dir.path().join("edited.txt"), "after").unwrap();
        std::fs::write(dir.path().join("same.txt"), "keep").unwrap();
        std::fs::remove_file(dir.path().join("gone.txt")).unwrap();

        assert_eq!(coordinator.modified_files(&snapshot).await, vec!["edited.txt"]);
    }
}
