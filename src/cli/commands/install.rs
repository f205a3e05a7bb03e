use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use crate::cli::Output;
use crate::config;
use crate::git::GitRepo;
use crate::hooks::HookInstaller;
use crate::hooks::installer::{SKIP_INSTALL_ENV, install_skipped};

#[derive(Args, Default)]
pub struct InstallArgs {
    /// Configuration file to install from (default: discovered in the project root)
    #[arg(value_name = "CONFIG")]
    pub config_file: Option<PathBuf>,
}

pub async fn execute(args: InstallArgs, global_config: Option<&Path>, output: Output) -> Result<()> {
    if install_skipped() {
        output.info(&format!(
            "{SKIP_INSTALL_ENV} is set, skipping hook installation"
        ));
        return Ok(());
    }

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let Ok(repo) = GitRepo::discover(&cwd) else {
        output.info("No git repository found, skipping hook installation");
        return Ok(());
    };

    let project_root = repo.workdir().map(Path::to_path_buf).unwrap_or(cwd);
    let explicit = args.config_file.as_deref().or(global_config);
    let config = config::load(&project_root, explicit)?;
    let output = Output::new(output.is_verbose() || config.verbose, output.is_quiet());

    let report = HookInstaller::new(repo, output)
        .with_config_path(explicit.map(Path::to_path_buf))
        .install(&config)?;

    let names: Vec<&str> = report.installed.iter().map(|hook| hook.as_str()).collect();
    output.success(&format!(
        "Installed {} hook(s): {}",
        names.len(),
        names.join(", ")
    ));
    if !report.removed.is_empty() {
        output.info(&format!("Removed {} unused hook(s)", report.removed.len()));
    }
    Ok(())
}
