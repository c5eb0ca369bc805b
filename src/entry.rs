use std::ffi::OsString;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::app::{is_interactive, run_fetch, run_view};
use crate::args::{Cli, Command};
use crate::config::types::ConfigFile;
use crate::config::{apply_fetch_config, apply_view_config, load_config};
use crate::error::AppResult;

pub(crate) fn run() -> AppResult<()> {
    let Some((mut cli, matches)) = parse_args()? else {
        return Ok(());
    };

    let config = load_config(cli.config.as_deref())?;
    if let Some(config) = config.as_ref() {
        apply_config(&mut cli.command, &matches, config)?;
    }

    let full_screen = matches!(&cli.command, Command::View(args) if is_interactive(args));
    crate::logger::init_logging(cli.verbose, full_screen);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_command(&cli.command, config.as_ref()))
}

fn parse_args() -> AppResult<Option<(Cli, ArgMatches)>> {
    let mut cmd = Cli::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    let cli = Cli::from_arg_matches(&matches)?;

    Ok(Some((cli, matches)))
}

fn should_show_help(raw_args: &[OsString]) -> bool {
    matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--")
}

/// Config values only fill what the subcommand's own flags left unset.
fn apply_config(command: &mut Command, matches: &ArgMatches, config: &ConfigFile) -> AppResult<()> {
    match command {
        Command::Fetch(args) => match matches.subcommand_matches("fetch") {
            Some(sub_matches) => apply_fetch_config(args, sub_matches, config),
            None => Ok(()),
        },
        Command::View(args) => match matches.subcommand_matches("view") {
            Some(sub_matches) => apply_view_config(args, sub_matches, config),
            None => Ok(()),
        },
    }
}

async fn run_command(command: &Command, config: Option<&ConfigFile>) -> AppResult<()> {
    match command {
        Command::Fetch(args) => run_fetch(args, config).await,
        Command::View(args) => run_view(args).await,
    }
}
