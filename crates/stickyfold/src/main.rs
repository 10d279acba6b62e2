mod cli;
mod commands;

use std::error::Error;

use clap::Parser;
use env_logger::Env;

use cli::Cli;
use cli::Command;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Command::Bind(args) => commands::run_bind(args),
        Command::Subopt(args) => commands::run_subopt(args),
    }
}
