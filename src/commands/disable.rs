use std::io::{BufRead, Write};
use std::process::Command;

use anyhow::{Context as _, Result};
use serde_json::Value;

use super::{Context, aborted, confirm};
use crate::error::ZtpError;
use crate::service;

/// Administratively disable provisioning.
///
/// A running session is stopped before admin mode flips so the service
/// cannot restart mid-transition. Afterwards the fallback profile, if any,
/// is rolled back.
pub fn disable(
    ctx: &mut Context,
    confirmed: bool,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    if !ctx.config.admin_mode() {
        writeln!(out, "ZTP is already disabled.")?;
        return Ok(());
    }

    let service_name = ctx.config.service_name();
    let active = service::is_active(ctx.manager, &service_name);

    if !confirmed {
        let prompt = if active {
            "Active ZTP session will be stopped and disabled, continue?"
        } else {
            "ZTP will be disabled, continue?"
        };
        if !confirm(input, out, prompt)? {
            return aborted(out);
        }
    }

    if active {
        ctx.manager
            .stop(&service_name)
            .with_context(|| format!("failed to stop {service_name}"))?;
        tracing::info!(service = %service_name, "stopped active session");
    }

    ctx.config.set("admin-mode", Value::Bool(false))?;
    tracing::info!("admin mode disabled");

    let profile = ctx.config.fallback_profile_path();
    if profile.is_file()
        && let Some(command) = ctx.config.rollback_command()
    {
        tracing::info!(profile = %profile.display(), %command, "rolling back provisioning profile");
        rollback(&command)?;
    }
    Ok(())
}

/// Run the external rollback command, split on whitespace.
fn rollback(command: &str) -> Result<(), ZtpError> {
    let mut parts = command.split_whitespace();
    let Some(program) = parts.next() else {
        return Ok(());
    };
    let failed = |details: String| ZtpError::RollbackFailed {
        command: command.to_string(),
        details,
    };
    let status = Command::new(program)
        .args(parts)
        .status()
        .map_err(|e| failed(e.to_string()))?;
    if status.success() {
        Ok(())
    } else {
        Err(failed(status.to_string()))
    }
}
