use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{display, output_object, output_success};
use crate::cli::{ApiClient, OutputFormat};

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login and print a session token")]
    Login {
        #[arg(help = "User id, e.g. SM0001 or the admin id")]
        user_id: String,
        #[arg(long, env = "POLICY_DESK_PASSWORD", hide_env_values = true, help = "Password")]
        password: String,
    },

    #[command(about = "Show the identity behind the current token")]
    Me,

    #[command(about = "Change your own password (sales managers)")]
    ChangePassword {
        #[arg(long, help = "Current password")]
        current: String,
        #[arg(long = "new", help = "New password")]
        new_password: String,
    },
}

pub async fn handle(cmd: AuthCommands, client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { user_id, password } => {
            let session = client
                .post("/auth/login", &json!({ "userId": user_id, "password": password }))
                .await?;

            match output_format {
                OutputFormat::Json => output_object(output_format, &session),
                OutputFormat::Text => {
                    println!(
                        "✓ Logged in as {} ({})",
                        display(&session["user"]["userId"]),
                        display(&session["user"]["role"])
                    );
                    println!("export POLICY_DESK_TOKEN={}", display(&session["token"]));
                    Ok(())
                }
            }
        }
        AuthCommands::Me => {
            require_token(client)?;
            let me = client.get("/auth/me", &[]).await?;
            output_object(output_format, &me)
        }
        AuthCommands::ChangePassword { current, new_password } => {
            require_token(client)?;
            client
                .post(
                    "/auth/change-password",
                    &json!({ "currentPassword": current, "newPassword": new_password }),
                )
                .await?;
            output_success(output_format, "Password updated", None)
        }
    }
}

pub fn require_token(client: &ApiClient) -> anyhow::Result<()> {
    if client.has_token() {
        Ok(())
    } else {
        anyhow::bail!("no session token; run `policyctl auth login` and export POLICY_DESK_TOKEN")
    }
}
