use anyhow::{Context, Result};
use clap::Args;

use crate::cli::Output;
use crate::git::GitRepo;
use crate::hooks::HookInstaller;

#[derive(Args)]
pub struct UninstallArgs {}

pub async fn execute(_args: UninstallArgs, output: Output) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let Ok(repo) = GitRepo::discover(&cwd) else {
        output.info("No git repository found, nothing to remove");
        return Ok(());
    };

    let removed = HookInstaller::new(repo, output).uninstall()?;
    if removed.is_empty() {
        output.info("No hooks were installed");
    } else {
        output.success(&format!("Removed {} hook(s)", removed.len()));
    }
    Ok(())
}
