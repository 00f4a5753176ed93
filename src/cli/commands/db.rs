use clap::Subcommand;

use crate::cli::utils::{connect, output_success};
use crate::cli::OutputFormat;
use crate::database::schema::{run_migrations, MIGRATIONS};

#[derive(Subcommand)]
pub enum DbCommands {
    #[command(about = "Create missing tables and indexes (idempotent)")]
    Migrate,
}

pub async fn handle(cmd: DbCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        DbCommands::Migrate => {
            let pool = connect().await?;
            run_migrations(&pool).await?;
            pool.close().await;
            output_success(
                output_format,
                &format!("Applied {} schema steps", MIGRATIONS.len()),
                Some(serde_json::json!({ "steps": MIGRATIONS.len() })),
            )
        }
    }
}
