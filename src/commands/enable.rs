use anyhow::Result;
use serde_json::Value;

use super::Context;

/// Administratively enable provisioning. Does not touch the service.
pub fn enable(ctx: &mut Context) -> Result<()> {
    if ctx.config.admin_mode() {
        tracing::debug!("admin mode already enabled");
        return Ok(());
    }
    ctx.config.set("admin-mode", Value::Bool(true))?;
    tracing::info!("admin mode enabled");
    Ok(())
}
