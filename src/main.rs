mod calendar;
mod client;
mod commands;
mod config;
mod models;
mod seeder;

use std::path::PathBuf;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};

use commands::Operation;

/// Danubit seeder: fill a development instance with demo associations,
/// activities and board members.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Seed file (defaults to the built-in demo data)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// API base URL, overrides the seed file
    #[arg(long, env = "DANUBIT_API_URL", global = true)]
    base_url: Option<String>,

    /// Print API responses and per-item failures
    #[arg(short = 'v', long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in as the admin and print the session
    #[command(alias = "loginAsAdmin")]
    Login,

    /// Create the associations from the seed file
    #[command(alias = "createBaseAsociations")]
    Asociations,

    /// Create the activities from the seed file
    #[command(alias = "createBaseActivities")]
    Activities,

    /// Make the admin Chair of every association on the server
    #[command(alias = "addAdminToAsosBoards")]
    Boards,

    /// Associations, then activities, then boards, with a single login
    All,

    /// Check the seed file and show what would be created
    Validate,
}

/// Subcommand names, for the usage hint on a bad invocation.
fn operation_names() -> Vec<String> {
    Cli::command()
        .get_subcommands()
        .map(|c| c.get_name().to_string())
        .filter(|n| n != "help")
        .collect()
}

fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            e.print().ok();
            println!("Options are: ");
            for name in operation_names() {
                println!("\t{}", name);
            }
            std::process::exit(e.exit_code());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = parse_cli();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let cfg = config::load_or_builtin(cli.config.as_deref())?;

    let op = match cli.command {
        Command::Validate => {
            return commands::describe_config(&cfg);
        }
        Command::Login => Operation::Login,
        Command::Asociations => Operation::Asociations,
        Command::Activities => Operation::Activities,
        Command::Boards => Operation::Boards,
        Command::All => Operation::All,
    };

    let client = commands::build_client(cli.base_url.as_deref(), &cfg)?;
    let result = commands::run(op, &client, &cfg).await?;
    commands::print_result(&result)
}
