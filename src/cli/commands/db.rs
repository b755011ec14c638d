use clap::Subcommand;
use serde_json::json;

use super::{close_after, connect_store};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::database::{seed, PgStore};

#[derive(Subcommand)]
pub enum DbCommands {
    #[command(about = "Create missing tables and indexes")]
    Migrate,

    #[command(about = "Recreate the demo user with sample lists")]
    Seed,
}

pub async fn handle(cmd: DbCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let store = connect_store().await?;
    close_after(&store, run(&store, cmd, output_format)).await
}

async fn run(store: &PgStore, cmd: DbCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        DbCommands::Migrate => output_success(output_format, "Schema is up to date", None),
        DbCommands::Seed => {
            let report = seed::seed(store).await?;
            output_success(
                output_format,
                &format!("Seeded {} with {} lists and {} items", report.email, report.lists, report.items),
                Some(json!({ "seed": report })),
            )
        }
    }
}
