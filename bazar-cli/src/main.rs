//! Bazar CLI - Shopping lists in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{clear, history, login, logout, logs, new, show, signup, status};

/// Bazar - shopping lists in your terminal
#[derive(Parser)]
#[command(name = "bz", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and sign in
    Signup {
        /// Email address (prompted if omitted)
        email: Option<String>,
        /// Display name shown on saved lists
        #[arg(long)]
        name: Option<String>,
    },

    /// Sign in to an existing account
    Login {
        /// Email address (prompted if omitted)
        email: Option<String>,
        /// Use the identity provider's federated flow
        #[arg(long)]
        federated: bool,
    },

    /// Sign out of the current session
    Logout,

    /// Create a new shopping list interactively
    New,

    /// Show saved lists, most recent first
    History {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one saved list in detail
    Show {
        /// List id
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete every saved list
    Clear {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Show session and storage status
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View and manage application logs
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Signup { email, name } => signup::run(email, name),
        Commands::Login { email, federated } => login::run(email, federated),
        Commands::Logout => logout::run(),
        Commands::New => new::run(),
        Commands::History { json } => history::run(json),
        Commands::Show { id, json } => show::run(&id, json),
        Commands::Clear { force } => clear::run(force),
        Commands::Status { json } => status::run(json),
        Commands::Logs { command } => logs::run(command),
    }
}
