//! cmdtree CLI
//!
//! Runs the demo command tree from the terminal

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cmdtree_core::logging_facility::{init, Profile};

mod commands;
mod demo;

#[derive(Debug, Parser)]
#[command(name = "cmdtree")]
#[command(about = "cmdtree - command tree dispatch playground", long_about = None)]
struct Cli {
    /// TOML message catalog overriding the default messages
    #[arg(long, global = true)]
    messages: Option<PathBuf>,

    /// Logging profile (dev or prod)
    #[arg(long, global = true, default_value = "dev")]
    log_profile: Profile,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Dispatch one command line
    Run(commands::run::RunArgs),
    /// Print completions for a partial command line
    Complete(commands::complete::CompleteArgs),
    /// Read command lines from stdin
    Repl(commands::repl::ReplArgs),
}

fn main() {
    let cli = Cli::parse();
    init(cli.log_profile);

    let result = commands::Session::open(cli.messages.as_deref()).and_then(|session| {
        match cli.command {
            Commands::Run(args) => commands::run::execute(&session, args),
            Commands::Complete(args) => commands::complete::execute(&session, args),
            Commands::Repl(args) => commands::repl::execute(&session, args),
        }
    });

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
