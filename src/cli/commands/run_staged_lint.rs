use anyhow::{Context, Result};
use clap::Args;
use std::path::Path;

use crate::cli::Output;
use crate::{config, git, staged_lint};

#[derive(Args, Clone)]
pub struct RunStagedLintArgs {
    /// Hook name (kebab-case or camelCase)
    pub hook: String,

    /// Restage files that lint commands modify
    #[arg(long, overrides_with = "no_auto_restage")]
    pub auto_restage: bool,

    /// Leave modified files unstaged
    #[arg(long, overrides_with = "auto_restage")]
    pub no_auto_restage: bool,
}

impl RunStagedLintArgs {
    /// Call-time restage override; `None` when neither flag was given.
    pub fn restage_override(&self) -> Option<bool> {
        if self.auto_restage {
            Some(true)
        } else if self.no_auto_restage {
            Some(false)
        } else {
            None
        }
    }
}

pub async fn execute(args: RunStagedLintArgs, config_path: Option<&Path>, output: Output) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let project_root = git::project_root(&cwd);

    let config = match config::load(&project_root, config_path) {
        Ok(config) => config,
        Err(e) => {
            output.error(&e.to_string());
            std::process::exit(1);
        }
    };
    let output = Output::new(output.is_verbose() || config.verbose, output.is_quiet());

    let passed = staged_lint::run_with_output(
        &args.hook,
        &config,
        &project_root,
        output,
        args.restage_override(),
    )
    .await;

    if !passed {
        std::process::exit(1);
    }
    Ok(())
}
