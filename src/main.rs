mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    commands::run(cli.command)
}
