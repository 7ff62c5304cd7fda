use crate::cli::utils::output_object;
use crate::cli::{ApiClient, OutputFormat};

pub async fn handle(client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    let data = client.get("/health", &[]).await?;
    output_object(output_format, &data)
}
