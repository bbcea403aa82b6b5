use crate::cli::{Cli, Command};
use crate::commands;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::logging;

pub async fn run(cli: Cli) -> AppResult<()> {
    let Cli {
        profile,
        profile_dir,
        json,
        notify,
        verbose,
        command,
    } = cli;

    logging::init(verbose)?;
    let ctx = AppContext::bootstrap(profile, profile_dir, json, notify)?;

    match command {
        Command::Report(args) => commands::report::run(&ctx, args).await,
        Command::Config(args) => commands::config::run(&ctx, args.command).await,
    }
}
