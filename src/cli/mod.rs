pub mod commands;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "bookctl")]
#[command(about = "bookctl - operator tooling for the Book API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Mint a bearer token for the /adminBook routes")]
    Token {
        #[arg(help = "Subject recorded in the token")]
        subject: String,
        #[arg(long, help = "Role claim (defaults to the configured admin role)")]
        role: Option<String>,
        #[arg(long, help = "Validity in hours (defaults to SECURITY_JWT_EXPIRY_HOURS)")]
        hours: Option<u64>,
    },

    #[command(about = "Create the books table if it does not exist")]
    Migrate,

    #[command(about = "Check database connectivity and report the book count")]
    Ping,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Token { subject, role, hours } => {
            commands::token::handle(subject, role, hours, output_format)
        }
        Commands::Migrate => commands::database::migrate(output_format).await,
        Commands::Ping => commands::database::ping(output_format).await,
    }
}
