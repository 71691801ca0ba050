mod builder;
mod chain;
mod commands;
mod config;
mod error;
mod flow;
mod prompts;
mod simulator;
mod tip20;
mod transaction;
mod utils;


use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use commands::{menu::main_menu, Command};
use config::Config;
use prompts::TerminalPrompter;

#[derive(Parser, Debug)]
#[command(name = "tx-builder", version, about = "Transaction Builder & Simulator CLI")]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Option<Command>,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("{}", format!("\nError: {err}").red());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> error::Result<()> {
    let chain = cli.config.connect().await?;
    let mut prompter = TerminalPrompter::new();

    match &cli.command {
        Some(command) => command.run(&mut prompter, &chain).await,
        None => main_menu(&mut prompter, &chain).await,
    }
}
