use clap::Subcommand;
use serde_json::Value;
use std::path::PathBuf;

use super::auth::require_token;
use crate::cli::utils::{display, output_object, output_success, output_table, read_json_input};
use crate::cli::{ApiClient, OutputFormat};
use crate::policy::PolicyType;

#[derive(Subcommand)]
pub enum PolicyCommands {
    #[command(about = "List your policies of one type")]
    List {
        #[arg(help = "health, motor or life")]
        policy_type: PolicyType,
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..12), help = "Month, 0 = January")]
        month: Option<u32>,
        #[arg(long, help = "Year, e.g. 2024")]
        year: Option<i32>,
        #[arg(long, help = "Case-insensitive holder name search")]
        search: Option<String>,
    },

    #[command(about = "Create a policy from a JSON document")]
    Create {
        policy_type: PolicyType,
        #[arg(long, help = "JSON file (reads stdin when omitted)")]
        file: Option<PathBuf>,
    },

    #[command(about = "Update fields of a policy from a JSON document")]
    Update {
        policy_type: PolicyType,
        id: String,
        #[arg(long, help = "JSON file (reads stdin when omitted)")]
        file: Option<PathBuf>,
    },

    #[command(about = "Delete a policy")]
    Delete { policy_type: PolicyType, id: String },
}

pub async fn handle(cmd: PolicyCommands, client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    require_token(client)?;

    match cmd {
        PolicyCommands::List { policy_type, month, year, search } => {
            let mut query = Vec::new();
            if let Some(month) = month {
                query.push(("month", month.to_string()));
            }
            if let Some(year) = year {
                query.push(("year", year.to_string()));
            }
            if let Some(search) = search {
                query.push(("search", search));
            }

            let records = client.get(policy_type.route(), &query).await?;
            let rows = records
                .as_array()
                .map(|items| items.iter().map(|r| row(policy_type, r)).collect())
                .unwrap_or_default();

            let date_header = policy_type.schema().date_field;
            output_table(
                output_format,
                &records,
                &["ID", "HOLDER", date_header],
                rows,
                &format!("No {} policies found", policy_type),
            )
        }
        PolicyCommands::Create { policy_type, file } => {
            let body = read_json_input(file.as_deref())?;
            let created = client.post(policy_type.route(), &body).await?;
            finish(output_format, "Policy created", created)
        }
        PolicyCommands::Update { policy_type, id, file } => {
            let body = read_json_input(file.as_deref())?;
            let path = format!("{}/{}", policy_type.route(), id);
            let updated = client.put(&path, &body).await?;
            finish(output_format, "Policy updated", updated)
        }
        PolicyCommands::Delete { policy_type, id } => {
            let path = format!("{}/{}", policy_type.route(), id);
            client.delete(&path).await?;
            output_success(output_format, "Policy deleted", None)
        }
    }
}

fn finish(output_format: OutputFormat, message: &str, record: Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => output_object(output_format, &record),
        OutputFormat::Text => {
            println!("✓ {} ({})", message, display(&record["id"]));
            Ok(())
        }
    }
}

fn row(policy_type: PolicyType, record: &Value) -> Vec<String> {
    let schema = policy_type.schema();
    vec![
        display(&record["id"]),
        display(&record[schema.name_field]),
        display(&record[schema.date_field]),
    ]
}
