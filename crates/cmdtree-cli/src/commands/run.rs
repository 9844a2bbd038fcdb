//! Run command
//!
//! Usage: cmdtree run [--as NAME] [--console] [--perm P]... -- LINE...

use clap::Args;

use super::{PrincipalArgs, Session};

#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub principal: PrincipalArgs,

    /// Command line to dispatch, e.g. `tp here Bob`
    #[arg(last = true, required = true, value_name = "LINE")]
    pub line: Vec<String>,
}

/// Execute run command
pub fn execute(session: &Session, args: RunArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let line = args.line.join(" ");
    let code = session.run_line(args.principal.principal(), &line);
    session.close();
    Ok(code)
}
