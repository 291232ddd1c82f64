//! devfinder CLI - command-line front end for the devfinder device catalog.
//!
//! Browses the catalog, runs conversational searches whose session survives
//! between invocations (per `--tab`), and exposes the admin mutations.

mod cli;
mod commands;
mod context;
mod error;
mod logging;
mod output;

use clap::Parser;

use cli::{Cli, Commands, SessionCommands};
use context::Context;
use error::{exit_codes, CliError};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let ctx = Context::build(&cli).await?;

    match cli.command {
        Commands::List(args) => commands::run_list(&ctx, args).await,
        Commands::Show(args) => commands::run_show(&ctx, args).await,
        Commands::Search(args) => commands::run_search(&ctx, args).await,
        Commands::Create(args) => commands::run_create(&ctx, args).await,
        Commands::Update(args) => commands::run_update(&ctx, args).await,
        Commands::Delete(args) => commands::run_delete(&ctx, args).await,
        Commands::Session(args) => match args.command {
            SessionCommands::Show => commands::run_session_show(&ctx).await,
            SessionCommands::Clear => commands::run_session_clear(&ctx).await,
        },
        Commands::Analytics => commands::run_analytics(&ctx).await,
    }
}
