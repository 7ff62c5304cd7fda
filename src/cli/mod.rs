pub mod client;
pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

pub use client::ApiClient;

#[derive(Parser)]
#[command(name = "policyctl")]
#[command(about = "Command-line client for the Policy Desk API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, env = "POLICY_DESK_URL", default_value = "http://localhost:5000", help = "API base URL")]
    pub server: String,

    #[arg(long, global = true, env = "POLICY_DESK_TOKEN", hide_env_values = true, help = "Session token from `auth login`")]
    pub token: Option<String>,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Check server and store health")]
    Health,

    #[command(about = "Login and session management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Sales manager administration (admin only)")]
    SalesManagers {
        #[command(subcommand)]
        cmd: commands::sales_managers::SalesManagerCommands,
    },

    #[command(about = "Health, motor and life policy records")]
    Policies {
        #[command(subcommand)]
        cmd: commands::policies::PolicyCommands,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
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
    let client = ApiClient::new(&cli.server, cli.token.clone())?;

    match cli.command {
        Commands::Health => commands::health::handle(&client, output_format).await,
        Commands::Auth { cmd } => commands::auth::handle(cmd, &client, output_format).await,
        Commands::SalesManagers { cmd } => commands::sales_managers::handle(cmd, &client, output_format).await,
        Commands::Policies { cmd } => commands::policies::handle(cmd, &client, output_format).await,
    }
}
