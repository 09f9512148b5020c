use anyhow::Result;
use clap::Parser;
use pocketspend::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run().await
}
