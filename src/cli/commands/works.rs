use chrono::{Duration, Utc};
use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{connect, output_success};
use crate::cli::OutputFormat;
use crate::database::WorkRepository;

#[derive(Subcommand)]
pub enum WorksCommands {
    #[command(about = "Permanently remove works that have been soft-deleted for a while")]
    PurgeInactive {
        #[arg(long, default_value_t = 30, help = "Only purge works inactive and untouched for this many days")]
        older_than_days: i64,
        #[arg(long, help = "Report how many works would be removed without deleting them")]
        dry_run: bool,
    },
}

pub async fn handle(cmd: WorksCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        WorksCommands::PurgeInactive { older_than_days, dry_run } => {
            if older_than_days < 0 {
                anyhow::bail!("--older-than-days cannot be negative");
            }
            let cutoff = Utc::now() - Duration::days(older_than_days);
            let repo = WorkRepository::new(connect().await?);

            if dry_run {
                let count = repo.count_inactive_before(cutoff).await?;
                return output_success(
                    output_format,
                    &format!("{} inactive works would be purged (cutoff {})", count, cutoff.to_rfc3339()),
                    Some(json!({ "count": count, "cutoff": cutoff, "dryRun": true })),
                );
            }

            let purged = repo.purge_inactive_before(cutoff).await?;
            tracing::info!("Purged {} inactive works older than {}", purged, cutoff);
            output_success(
                output_format,
                &format!("Purged {} inactive works", purged),
                Some(json!({ "count": purged, "cutoff": cutoff, "dryRun": false })),
            )
        }
    }
}
