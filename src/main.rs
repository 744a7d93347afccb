mod cli;
mod commands;
mod config;
mod engine;
mod state;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use commands::Globals;
use std::io;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    let globals = Globals {
        manifest: cli.manifest,
        state: cli.state,
        token: cli.token,
        url: cli.url,
    };

    match cli.command {
        Command::Plan(args) => commands::plan::run(&ctx, &globals, args),
        Command::Apply(args) => commands::apply::run(&ctx, &globals, args),
        Command::Refresh(args) => commands::refresh::run(&ctx, &globals, args),
        Command::Destroy(args) => commands::destroy::run(&ctx, &globals, args),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "vapi-sync", &mut io::stdout());
            Ok(())
        }
    }
}
