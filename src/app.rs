use crate::cli::{Cli, Command};
use crate::commands;
use crate::context::AppContext;
use crate::error::AppResult;

pub async fn run(cli: Cli) -> AppResult<()> {
    let Cli {
        profile,
        json,
        verbose: _,
        connection_id,
        command,
    } = cli;

    let ctx = AppContext::bootstrap(profile, json, connection_id)?;

    match command {
        Command::Tools(args) => commands::tools::run(&ctx, args),
        Command::Call(args) => commands::call::run(&ctx, args).await,
        Command::Serve => commands::serve::run(&ctx).await,
    }
}
