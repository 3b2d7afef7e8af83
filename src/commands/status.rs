use std::io::Write;

use anyhow::Result;

use super::Context;
use crate::display::StatusSnapshot;
use crate::display::renderer::Renderer;

/// Which report `status` prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusView {
    Terse,
    Verbose,
    Coded,
}

impl StatusView {
    /// Verbose takes precedence over coded when both flags are given.
    pub fn from_flags(verbose: bool, coded: bool) -> Self {
        if verbose {
            StatusView::Verbose
        } else if coded {
            StatusView::Coded
        } else {
            StatusView::Terse
        }
    }
}

/// Display the reconciled provisioning status.
pub fn status<W: Write>(ctx: &Context, view: StatusView, renderer: &mut Renderer<W>) -> Result<()> {
    let snap = StatusSnapshot::gather(&ctx.config, ctx.manager, ctx.clock, ctx.privileged);
    match view {
        StatusView::Coded => renderer.render_coded(&snap)?,
        StatusView::Terse => renderer.render_terse(&snap)?,
        StatusView::Verbose => renderer.render_verbose(&snap)?,
    }
    Ok(())
}
