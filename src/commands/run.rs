use std::ffi::OsString;
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};

use super::{Context, aborted, confirm, erase::erase};
use crate::error::ZtpError;

/// Restart provisioning from scratch.
///
/// Refuses to run while administratively disabled, before asking anything.
pub fn run(
    ctx: &Context,
    confirmed: bool,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    if !ctx.config.admin_mode() {
        return Err(ZtpError::AdminDisabled.into());
    }

    if !confirmed {
        let prompt = "ZTP will be restarted. You may lose switch data and connectivity, continue?";
        if !confirm(input, out, prompt)? {
            return aborted(out);
        }
    }

    erase(ctx, true, input, out)?;

    // A present startup config makes the service skip provisioning.
    let startup = ctx.config.startup_config_path();
    if ctx.config.monitor_startup_config() && startup.is_file() {
        let aside = aside_path(&startup, ctx.clock.now());
        fs::rename(&startup, &aside).with_context(|| {
            format!("failed to move {} to {}", startup.display(), aside.display())
        })?;
        tracing::info!(from = %startup.display(), to = %aside.display(), "moved startup config aside");
    }

    let service_name = ctx.config.service_name();
    ctx.manager
        .start(&service_name)
        .with_context(|| format!("failed to start {service_name}"))?;
    tracing::info!(service = %service_name, "started provisioning session");
    Ok(())
}

/// `<path>.<YYYYmmdd-HHMMSS>`
fn aside_path(path: &Path, at: DateTime<Utc>) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(format!(".{}", at.format("%Y%m%d-%H%M%S")));
    PathBuf::from(name)
}
