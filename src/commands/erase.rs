use std::io::{BufRead, Write};

use anyhow::{Context as _, Result};

use super::{Context, aborted, confirm, remove_if_exists};
use crate::service;

/// Stop any running session and delete both copies of the session state.
pub fn erase(
    ctx: &Context,
    confirmed: bool,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let service_name = ctx.config.service_name();
    let active = service::is_active(ctx.manager, &service_name);

    if !confirmed {
        let prompt = if active {
            "Active ZTP session will be stopped and all ZTP session data erased, continue?"
        } else {
            "All ZTP session data will be erased, continue?"
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

    let paths = ctx.config.state_paths();
    remove_if_exists(&paths.primary)?;
    remove_if_exists(&paths.shadow)?;
    Ok(())
}
