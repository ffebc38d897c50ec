mod app;
mod commands;
mod output;

use clap::Parser;

use crate::app::{Cli, Command};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // cilgraph info+ on stderr unless --json; --verbose enables debug; RUST_LOG overrides
    if !cli.global.json {
        let level = if cli.global.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        };
        env_logger::Builder::new()
            .filter_module("cilgraph", level)
            .parse_default_env()
            .target(env_logger::Target::Stderr)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(false)
            .init();
    }

    match &cli.command {
        Command::Dump { path, all } => commands::dump::run(path, !*all, &cli.global),
        Command::Types { path, namespace } => {
            commands::types::run(path, namespace.as_deref(), &cli.global)
        }
        Command::Modules { path } => commands::modules::run(path, &cli.global),
        Command::Resolve { path, name } => commands::resolve::run(path, name, &cli.global),
    }
}
