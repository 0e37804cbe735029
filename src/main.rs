use clap::Parser;
use rnamotif::{
    cli::{init_verbose, Cli, Command, FULL_VERSION},
    commands::{profile, search},
    utils::{handle_error_and_exit, Result},
};

fn runner() -> Result<()> {
    let cli = Cli::parse();
    init_verbose(&cli);
    let subcommand_name = match cli.command {
        Command::Search(_) => "search",
        Command::Profile(_) => "profile",
    };

    log::info!(
        "Running {}-{} [{}]",
        env!("CARGO_PKG_NAME"),
        *FULL_VERSION,
        subcommand_name
    );
    match cli.command {
        Command::Search(args) => search::search(args)?,
        Command::Profile(args) => profile::profile(args)?,
    }
    log::info!("{} end", env!("CARGO_PKG_NAME"));
    Ok(())
}

fn main() {
    if let Err(e) = runner() {
        handle_error_and_exit(e);
    }
}
