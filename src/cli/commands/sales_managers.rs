use clap::Subcommand;
use serde_json::{json, Value};

use super::auth::require_token;
use crate::cli::utils::{display, output_success, output_table};
use crate::cli::{ApiClient, OutputFormat};

#[derive(Subcommand)]
pub enum SalesManagerCommands {
    #[command(about = "List sales managers, newest first")]
    List,

    #[command(about = "Create a sales manager; the SM#### id is assigned by the server")]
    Create {
        #[arg(long, help = "Initial password")]
        password: String,
    },

    #[command(about = "Reset a sales manager's password")]
    ResetPassword {
        #[arg(help = "Internal id (uuid) of the sales manager")]
        id: String,
        #[arg(long, help = "New password")]
        password: String,
    },
}

pub async fn handle(cmd: SalesManagerCommands, client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    require_token(client)?;

    match cmd {
        SalesManagerCommands::List => {
            let managers = client.get("/users/sales-managers", &[]).await?;
            let rows = managers
                .as_array()
                .map(|items| items.iter().map(row).collect())
                .unwrap_or_default();
            output_table(output_format, &managers, &["ID", "USER ID", "CREATED"], rows, "No sales managers yet")
        }
        SalesManagerCommands::Create { password } => {
            let created = client.post("/users/sales-managers", &json!({ "password": password })).await?;
            let message = format!("Created sales manager {}", display(&created["userId"]));
            output_success(output_format, &message, Some(created))
        }
        SalesManagerCommands::ResetPassword { id, password } => {
            let path = format!("/users/sales-managers/{}/reset-password", id);
            client.put(&path, &json!({ "newPassword": password })).await?;
            output_success(output_format, "Password reset", None)
        }
    }
}

fn row(item: &Value) -> Vec<String> {
    vec![display(&item["id"]), display(&item["userId"]), display(&item["createdAt"])]
}
