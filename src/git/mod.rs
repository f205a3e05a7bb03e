//! Git integration layer
//!
//! Repository discovery and hook file management go through git2. Reading
//! and writing the index for staged-lint shells out to the `git` binary; see
//! [`staged`].

use anyhow::{Context, Result};
use git2::Repository;
use std::path::{Path, PathBuf};

use crate::hooks::GitHook;

pub mod staged;

pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Open a repository at exactly this path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::open(path).context("Failed to open Git repository")?;
        Ok(Self { repo })
    }

    /// Discover the repository containing `path`, walking up parent directories
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::discover(path).context("No Git repository found")?;
        Ok(Self { repo })
    }

    /// Working tree root, if the repository is not bare
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    /// Directory git reads hooks from.
    ///
    /// `core.hooksPath` wins when set; relative values resolve against the
    /// working tree. Otherwise hooks live in the common git dir so that
    /// linked worktrees share them.
    pub fn hooks_dir(&self) -> Result<PathBuf> {
        let config = self.repo.config().context("Failed to read git config")?;

        if let Ok(custom) = config.get_path("core.hooksPath") {
            if custom.is_absolute() {
                return Ok(custom);
            }
            let base = self.workdir().unwrap_or_else(|| self.repo.path());
            return Ok(base.join(custom));
        }

        Ok(self.repo.commondir().join("hooks"))
    }

    pub fn hook_path(&self, hook: GitHook) -> Result<PathBuf> {
        Ok(self.hooks_dir()?.join(hook.as_str()))
    }

    /// Write an executable hook script, creating the hooks directory if needed
    pub fn install_hook(&self, hook: GitHook, hook_content: &str) -> Result<PathBuf> {
        let hooks_dir = self.hooks_dir()?;
        let hook_path = hooks_dir.join(hook.as_str());

        std::fs::create_dir_all(&hooks_dir).with_context(|| {
            format!("Failed to create hooks directory {}", hooks_dir.display())
        })?;

        std::fs::write(&hook_path, hook_content)
            .with_context(|| format!("Failed to write hook file {}", hook_path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&hook_path)
                .context("Failed to get hook file metadata")?
                .permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&hook_path, perms)
                .context("Failed to set hook file permissions")?;
        }

        tracing::debug!("installed {hook} at {}", hook_path.display());
        Ok(hook_path)
    }

    /// Remove a hook script. Returns whether a file was actually removed.
    pub fn remove_hook(&self, hook: GitHook) -> Result<bool> {
        let hook_path = self.hook_path(hook)?;

        if !hook_path.exists() {
            return Ok(false);
        }

        std::fs::remove_file(&hook_path)
            .with_context(|| format!("Failed to remove hook file {}", hook_path.display()))?;
        tracing::debug!("removed {hook} from {}", hook_path.display());
        Ok(true)
    }
}

/// Directory staged-lint runs in: the work tree of the repository containing
/// `dir`, or `dir` itself outside a repository.
pub fn project_root(dir: &Path) -> PathBuf {
    GitRepo::discover(dir)
        .ok()
        .and_then(|repo| repo.workdir().map(Path::to_path_buf))
        .unwrap_or_else(|| dir.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_hooks_dir_defaults_to_git_dir() -> Result<()> {
        let temp_dir = TempDir::new()?;
        Repository::init(temp_dir.path())?;

        let repo = GitRepo::open(temp_dir.path())?;
        let actual = repo.hooks_dir()?;
        std::fs::create_dir_all(&actual)?;
        assert_eq!(
            actual.canonicalize()?,
            temp_dir.path().join(".git").join("hooks").canonicalize()?
        );
        Ok(())
    }

    #[test]
    fn test_hooks_dir_honours_core_hooks_path() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let raw = Repository::init(temp_dir.path())?;
        raw.config()?.set_str("core.hooksPath", ".githooks")?;

        let repo = GitRepo::open(temp_dir.path())?;
        let hooks_dir = repo.hooks_dir()?;
        assert!(hooks_dir.ends_with(".githooks"));
        assert!(hooks_dir.starts_with(repo.workdir().unwrap()));
        Ok(())
    }

    #[test]
    fn test_install_and_remove_hook() -> Result<()> {
        let temp_dir = TempDir::new()?;
        Repository::init(temp_dir.path())?;
        let repo = GitRepo::open(temp_dir.path())?;

        assert!(!repo.hook_path(GitHook::PrePush)?.exists());
        let path = repo.install_hook(GitHook::PrePush, "#!/bin/sh\nexit 0\n")?;
        assert_eq!(path, repo.hook_path(GitHook::PrePush)?);
        assert_eq!(std::fs::read_to_string(&path)?, "#!/bin/sh\nexit 0\n");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path)?.permissions().mode();
            assert_eq!(mode & 0o777, 0o755);
        }

        assert!(repo.remove_hook(GitHook::PrePush)?);
        assert!(!repo.remove_hook(GitHook::PrePush)?);
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_project_root_is_the_work_tree() -> Result<()> {
        let temp_dir = TempDir::new()?;
        Repository::init(temp_dir.path())?;
        let nested = temp_dir.path().join("src").join("nested");
        std::fs::create_dir_all(&nested)?;

        assert_eq!(
            project_root(&nested).canonicalize()?,
            temp_dir.path().canonicalize()?
        );
        Ok(())
    }
}
