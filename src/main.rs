use anyhow::Result;
use clap::Parser;

use gitsh::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
