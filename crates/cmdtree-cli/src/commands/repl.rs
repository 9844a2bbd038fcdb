//! Repl command
//!
//! Usage: cmdtree repl [--as NAME] [--console] [--perm P]...
//!
//! Reads one command line per stdin line. `quit` exits and
//! `complete <partial>` prints suggestions instead of dispatching.

use std::io::BufRead;

use clap::Args;

use super::{PrincipalArgs, Session};

const QUIT: &str = "quit";
const COMPLETE_PREFIX: &str = "complete ";

#[derive(Debug, Args)]
pub struct ReplArgs {
    #[command(flatten)]
    pub principal: PrincipalArgs,
}

/// Execute repl command
pub fn execute(session: &Session, args: ReplArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let principal = args.principal.principal();
    session.start_maintenance()?;

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim_start();

        if trimmed.trim_end() == QUIT {
            break;
        }
        if trimmed.trim().is_empty() {
            continue;
        }

        if let Some(partial) = trimmed.strip_prefix(COMPLETE_PREFIX) {
            for suggestion in session.registry.complete_line(principal.clone(), partial) {
                println!("{}", suggestion);
            }
            continue;
        }

        if session.run_line(principal.clone(), trimmed) == 2 {
            println!("Unknown command: {}", trimmed.trim());
        }
    }

    session.close();
    Ok(0)
}
