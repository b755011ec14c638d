use anyhow::Context;
use serde_json::json;

use super::{close_after, connect_store};
use crate::auth::issue_token;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config;

pub async fn handle(email: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let store = connect_store().await?;
    let lookup = async { store.find_user_by_email(email).await.map_err(anyhow::Error::from) };
    let user = close_after(&store, lookup)
        .await?
        .with_context(|| format!("no user with email {}", email))?;
    let token = issue_token(&user)?;

    match output_format {
        OutputFormat::Text => println!("{}", token),
        OutputFormat::Json => output_success(
            output_format,
            "Token issued",
            Some(json!({
                "token": token,
                "user_id": user.id,
                "expires_in_hours": config::config().security.jwt_expiry_hours,
            })),
        )?,
    }
    Ok(())
}
