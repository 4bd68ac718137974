use anyhow::Result;
use clap::Parser;
use rawhttp::cli::Cli;

#[async_std::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    cli.run().await
}
