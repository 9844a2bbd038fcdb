//! Complete command
//!
//! Usage: cmdtree complete [--as NAME] [--console] [--perm P]... -- LINE...
//!
//! A trailing space in LINE asks for suggestions for the next token.

use clap::Args;

use super::{PrincipalArgs, Session};

#[derive(Debug, Args)]
pub struct CompleteArgs {
    #[command(flatten)]
    pub principal: PrincipalArgs,

    /// Partial command line
    #[arg(last = true, value_name = "LINE")]
    pub line: Vec<String>,
}

/// Execute complete command
pub fn execute(session: &Session, args: CompleteArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let line = args.line.join(" ");
    for suggestion in session
        .registry
        .complete_line(args.principal.principal(), &line)
    {
        println!("{}", suggestion);
    }
    Ok(0)
}
