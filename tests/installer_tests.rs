//! Installing and removing hook scripts in a real repository.

mod common;

use anyhow::Result;
use common::TestRepo;
use git_hooks::config::ConfigError;
use git_hooks::hooks::{GitHook, HookInstaller};
use git_hooks::{HooksConfig, Output};

fn installer(repo: &TestRepo) -> HookInstaller {
    HookInstaller::discover(repo.path(), Output::default()).unwrap()
}

#[test]
fn test_install_writes_configured_hooks() -> Result<()> {
    let repo = TestRepo::new()?;
    let config = HooksConfig::from_json_str(
        r#"{
            "preCommit": {"stagedLint": {"*.rs": "rustfmt --check"}},
            "commit-msg": "gitlint --msg-filename \"$1\""
        }"#,
    )?;

    let report = installer(&repo).install(&config)?;

    assert_eq!(report.installed, vec![GitHook::PreCommit, GitHook::CommitMsg]);

    let pre_commit = std::fs::read_to_string(repo.hook_path("pre-commit"))?;
    assert!(pre_commit.starts_with("#!/bin/sh"));
    assert!(pre_commit.contains("SKIP_GIT_HOOKS"));
    assert!(pre_commit.trim_end().ends_with("git-hooks run-staged-lint pre-commit"));

    let commit_msg = std::fs::read_to_string(repo.hook_path("commit-msg"))?;
    assert!(commit_msg.trim_end().ends_with("gitlint --msg-filename \"$1\""));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(repo.hook_path("pre-commit"))?.permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
    }
    Ok(())
}

#[test]
fn test_staged_lint_on_pre_push_is_rejected_before_writing() -> Result<()> {
    let repo = TestRepo::new()?;
    let config = HooksConfig::from_json_str(
        r#"{
            "commit-msg": "gitlint",
            "pre-push": {"stagedLint": {"*.js": "eslint"}}
        }"#,
    )?;

    let err = installer(&repo).install(&config).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::StagedLintNotAllowed(GitHook::PrePush))
    ));
    assert!(!repo.hook_path("commit-msg").exists());
    assert!(!repo.hook_path("pre-push").exists());
    Ok(())
}

#[test]
fn test_unconfigured_hooks_are_removed_unless_preserved() -> Result<()> {
    let repo = TestRepo::new()?;
    let installer = installer(&repo);
    installer.repo().install_hook(GitHook::PostMerge, "#!/bin/sh\necho merged\n")?;
    installer.repo().install_hook(GitHook::PreRebase, "#!/bin/sh\nexit 0\n")?;

    let preserving = HooksConfig::from_json_str(
        r#"{"pre-push": "cargo test", "preserveUnused": ["post-merge"]}"#,
    )?;
    let report = installer.install(&preserving)?;
    assert_eq!(report.removed, vec![GitHook::PreRebase]);
    assert!(repo.hook_path("post-merge").exists());

    let strict = HooksConfig::from_json_str(r#"{"pre-push": "cargo test"}"#)?;
    let report = installer.install(&strict)?;
    assert_eq!(report.removed, vec![GitHook::PostMerge]);
    assert!(!repo.hook_path("post-merge").exists());
    assert!(repo.hook_path("pre-push").exists());
    Ok(())
}

#[test]
fn test_preserve_all() -> Result<()> {
    let repo = TestRepo::new()?;
    let installer = installer(&repo);
    installer.repo().install_hook(GitHook::PostCheckout, "#!/bin/sh\n")?;

    let config =
        HooksConfig::from_json_str(r#"{"pre-push": "cargo test", "preserveUnused": true}"#)?;
    let report = installer.install(&config)?;

    assert!(report.removed.is_empty());
    assert!(repo.hook_path("post-checkout").exists());
    Ok(())
}

#[test]
fn test_config_without_hooks_is_rejected() -> Result<()> {
    let repo = TestRepo::new()?;
    let config = HooksConfig::from_json_str(r#"{"verbose": true}"#)?;

    let err = installer(&repo).install(&config).unwrap_err();
    assert!(matches!(err.downcast_ref::<ConfigError>(), Some(ConfigError::NoHooks)));
    Ok(())
}

#[test]
fn test_uninstall_removes_every_hook() -> Result<()> {
    let repo = TestRepo::new()?;
    let installer = installer(&repo);
    let config = HooksConfig::from_json_str(
        r#"{"pre-commit": "cargo fmt --check", "pre-push": "cargo test"}"#,
    )?;
    installer.install(&config)?;

    let removed = installer.uninstall()?;

    assert_eq!(removed, vec![GitHook::PreCommit, GitHook::PrePush]);
    assert!(!repo.hook_path("pre-commit").exists());
    assert!(!repo.hook_path("pre-push").exists());
    assert!(installer.uninstall()?.is_empty());
    Ok(())
}
