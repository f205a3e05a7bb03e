//! Command-line interface
//!
//! `git-hooks` with no subcommand installs hooks from the discovered
//! configuration, which makes it usable directly as a `prepare`/`postinstall`
//! step.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod output;

pub use output::Output;

#[derive(Parser)]
#[command(
    name = "git-hooks",
    version = env!("CARGO_PKG_VERSION"),
    about = "Declarative git hooks with staged-file linting",
    long_about = "Installs git hooks from a configuration file and runs linters against \
                  staged files, restaging anything the linters fix."
)]
pub struct Cli {
    /// Run as if started in <DIR> instead of current working directory
    #[arg(short = 'C', long = "directory", global = true)]
    pub directory: Option<PathBuf>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use custom configuration file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Install git hooks from the configuration (default)
    Install(commands::install::InstallArgs),
    /// Remove all installed hooks
    #[command(visible_alias = "remove")]
    Uninstall(commands::uninstall::UninstallArgs),
    /// Lint staged files for a hook
    RunStagedLint(commands::run_staged_lint::RunStagedLintArgs),
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        setup_logging(self.verbose, self.quiet);

        let output = Output::new(self.verbose > 0, self.quiet);
        let config = self.config.as_deref();

        match self.command {
            Some(Commands::Install(args)) => commands::install::execute(args, config, output).await,
            Some(Commands::Uninstall(args)) => commands::uninstall::execute(args, output).await,
            Some(Commands::RunStagedLint(args)) => {
                commands::run_staged_lint::execute(args, config, output).await
            }
            None => {
                commands::install::execute(commands::install::InstallArgs::default(), config, output)
                    .await
            }
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 | 1 => tracing_subscriber::EnvFilter::new("warn"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
