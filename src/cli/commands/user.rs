use clap::Subcommand;
use serde_json::json;

use super::{close_after, connect_store};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::database::PgStore;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create a user account")]
    Add {
        #[arg(help = "Email address")]
        email: String,
    },

    #[command(about = "Delete a user account with all of its lists")]
    Delete {
        #[arg(help = "Email address")]
        email: String,
    },
}

pub async fn handle(cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let store = connect_store().await?;
    close_after(&store, run(&store, cmd, output_format)).await
}

async fn run(store: &PgStore, cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        UserCommands::Add { email } => {
            if let Some(existing) = store.find_user_by_email(&email).await? {
                anyhow::bail!("user {} already exists ({})", email, existing.id);
            }
            let user = store.create_user(&email).await?;
            output_success(
                output_format,
                &format!("Created user {} ({})", user.email, user.id),
                Some(json!({ "user": user })),
            )
        }
        UserCommands::Delete { email } => {
            if !store.delete_user_by_email(&email).await? {
                anyhow::bail!("no user with email {}", email);
            }
            output_success(output_format, &format!("Deleted user {}", email), None)
        }
    }
}
