mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    diff, init, parse, plain, render, sync, DiffArgs, InitArgs, ParseArgs, PlainArgs, RenderArgs,
    SyncArgs,
};
use config::Config;
use tracing_subscriber::EnvFilter;

/// Texpad CLI - markup and plain text in and out of collaborative pads
#[derive(Parser, Debug)]
#[command(name = "texpad")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default texpad.config.json
    Init(InitArgs),

    /// Print a file's tagged characters as JSON
    Parse(ParseArgs),

    /// Parse markup and serialize it again
    Render(RenderArgs),

    /// Run a file through the plain-text codec
    Plain(PlainArgs),

    /// Print the changeset between two versions of a file
    Diff(DiffArgs),

    /// Sync a file into its pad in a workspace snapshot
    Sync(SyncArgs),
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?.display().to_string();
    let config = Config::load(&cwd)?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Parse(args) => parse(args, &config, &cwd),
        Command::Render(args) => render(args, &cwd),
        Command::Plain(args) => plain(args, &cwd),
        Command::Diff(args) => diff(args, &config, &cwd),
        Command::Sync(args) => sync(args, &config, &cwd),
    }
}
