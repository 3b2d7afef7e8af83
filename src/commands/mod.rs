use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context as _, Result};

use crate::config::Config;
use crate::error::ZtpError;
use crate::service::ServiceManager;
use crate::time::Clock;

pub mod disable;
pub mod enable;
pub mod erase;
pub mod features;
pub mod run;
pub mod status;

/// Explicit dependencies threaded through every command.
pub struct Context<'a> {
    pub config: Config,
    pub manager: &'a dyn ServiceManager,
    pub clock: &'a dyn Clock,
    /// Whether the caller runs with elevated privileges.
    pub privileged: bool,
}

/// Subcommands that change system state and therefore need root.
const PRIVILEGED_COMMANDS: [&str; 4] = ["enable", "disable", "erase", "run"];

/// Whether the subcommand named `command` needs root.
pub fn requires_privilege(command: &str) -> bool {
    PRIVILEGED_COMMANDS.contains(&command)
}

/// Fail with [`ZtpError::Unauthorized`] if `command` needs root and the
/// caller lacks it. Checked before any state is touched.
pub fn authorize(command: &str, privileged: bool) -> Result<(), ZtpError> {
    if requires_privilege(command) && !privileged {
        return Err(ZtpError::Unauthorized);
    }
    Ok(())
}

/// Whether the current process runs as root.
pub fn running_as_root() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

/// Ask a yes/no question. Only `y` or `yes` (any case) counts as consent;
/// empty input and end of input decline.
pub fn confirm(input: &mut impl BufRead, out: &mut impl Write, prompt: &str) -> io::Result<bool> {
    write!(out, "{prompt} [y/N]: ")?;
    out.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim().to_ascii_lowercase();
    Ok(matches!(answer.as_str(), "y" | "yes"))
}

/// Tell the operator nothing was changed.
pub(crate) fn aborted(out: &mut impl Write) -> Result<()> {
    writeln!(out, "Aborted.")?;
    Ok(())
}

/// Delete `path`; a file that is already gone is not an error.
pub(crate) fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "removed");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("failed to remove {}", path.display())),
    }
}
