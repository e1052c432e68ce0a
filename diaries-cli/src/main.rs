//! `diaries` — command-line requestor family for the diaries service
//!
//! Each subcommand is one short workflow against the remote service:
//! connect to the broker, subscribe to the private reply topic, perform the
//! command's RPC calls, and disconnect on every exit path.

mod commands;

use clap::{Parser, Subcommand};
use diaries_client::Config;
use diaries_core::{Registration, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "diaries", about = "RPC requestor for the diaries service")]
struct Cli {
    /// Configuration file
    #[arg(short, long)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and persist the session tokens
    Signin {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Register a new user
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
        #[arg(short, long)]
        firstname: String,
        #[arg(short, long)]
        lastname: String,
        #[arg(long)]
        knownas: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
    },
    /// List the signed-in user's diaries
    GetDiaries,
    /// List the pages of the user's first diary
    GetPages,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_path(&cli.config)?;

    match cli.command {
        Command::Signin { username, password } => {
            commands::signin::run(&config, &username, &password).await
        }
        Command::Register {
            username,
            password,
            firstname,
            lastname,
            knownas,
            email,
            phone,
        } => {
            let registration = Registration {
                username,
                password,
                firstname,
                lastname,
                knownas,
                email,
                phone,
            };
            commands::register::run(&config, &registration).await
        }
        Command::GetDiaries => commands::get_diaries::run(&config).await,
        Command::GetPages => commands::get_pages::run(&config).await,
    }
}
