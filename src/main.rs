use anyhow::Result;
use clap::Parser;
use git_hooks::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run().await
}
