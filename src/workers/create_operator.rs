use crate::common::init;
use crate::settings::AppSettings;
use crate::usecases::users;
use anyhow::anyhow;
use std::env;
use tracing::info;

fn required_var(name: &str) -> anyhow::Result<String> {
    let value = env::var(name).map_err(|_| anyhow!("{name} must be set"))?;
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(anyhow!("{name} must not be empty"));
    }
    Ok(value)
}

/// Creates the operator account that logs into the admin panel.
pub async fn serve(settings: &AppSettings) -> anyhow::Result<()> {
    let name = required_var("OPERATOR_NAME")?;
    let email = required_var("OPERATOR_EMAIL")?;
    let password = required_var("OPERATOR_PASSWORD")?;

    let ctx = init::initialize_state(settings).await?;
    let user = users::create(&ctx, &name, &email, password)
        .await
        .map_err(|e| anyhow!("{}: {}", e.code(), e.message()))?;
    info!(user_id = user.user_id, email = %user.email, "Operator ready");
    Ok(())
}
