mod cli;

use std::any::Any;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use ztpctl::commands::{self, Context, status::StatusView};
use ztpctl::config::{Config, DEFAULT_CONFIG_PATH};
use ztpctl::display::renderer::Renderer;
use ztpctl::error::ZtpError;
use ztpctl::logging;
use ztpctl::service::Systemctl;
use ztpctl::time::SystemClock;

use cli::{Cli, Command};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();
    let name = cli.command.name();

    // Commands are synchronous; run them off the runtime so signals stay responsive.
    let task = tokio::task::spawn_blocking(move || execute(cli));

    tokio::select! {
        joined = task => match joined {
            Ok(Ok(())) => ExitCode::SUCCESS,
            Ok(Err(e)) => {
                report_error(name, &e);
                ExitCode::FAILURE
            }
            Err(e) => {
                let reason = if e.is_panic() {
                    panic_message(e.into_panic())
                } else {
                    e.to_string()
                };
                tracing::error!(command = name, %reason, "command panicked");
                eprintln!("Error: ztp {name} failed: {reason}");
                ExitCode::FAILURE
            }
        },
        signal = shutdown_signal() => {
            tracing::info!(command = name, signal, "received signal, exiting");
            // The blocking command thread may be parked on stdin; don't wait for it.
            std::process::exit(0);
        }
    }
}

fn execute(cli: Cli) -> Result<()> {
    let privileged = commands::running_as_root();
    commands::authorize(cli.command.name(), privileged)?;

    let config = match cli.config_json {
        Some(path) => Config::load(&path, true)?,
        None => Config::load(&PathBuf::from(DEFAULT_CONFIG_PATH), false)?,
    };
    tracing::debug!(config = %config.path().display(), "configuration loaded");

    let manager = Systemctl;
    let clock = SystemClock;
    let mut ctx = Context {
        config,
        manager: &manager,
        clock: &clock,
        privileged,
    };

    let mut input = io::stdin().lock();
    let mut out = io::stdout().lock();

    match cli.command {
        Command::Enable => commands::enable::enable(&mut ctx)?,
        Command::Disable { yes } => commands::disable::disable(&mut ctx, yes, &mut input, &mut out)?,
        Command::Erase { yes } => commands::erase::erase(&ctx, yes, &mut input, &mut out)?,
        Command::Run { yes } => commands::run::run(&ctx, yes, &mut input, &mut out)?,
        Command::Features { verbose } => {
            commands::features::features(&ctx.config, verbose, &mut out)?;
        }
        Command::Status { verbose, code } => {
            let view = StatusView::from_flags(verbose, code);
            commands::status::status(&ctx, view, &mut Renderer::new())?;
        }
    }
    Ok(())
}

/// Print a fatal error. Operator-facing errors are shown as-is; anything else
/// is reported with the command that failed.
fn report_error(command: &str, err: &anyhow::Error) {
    tracing::error!(command, error = %format!("{err:#}"), "command failed");
    if let Some(e) = err.downcast_ref::<ZtpError>() {
        eprintln!("{e}");
    } else {
        eprintln!("Error: ztp {command} failed: {err:#}");
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic".to_string()
    }
}

/// Resolve on SIGINT or SIGTERM, returning the signal's name.
async fn shutdown_signal() -> &'static str {
    use tokio::signal::unix::{SignalKind, signal};

    let mut term = match signal(SignalKind::terminate()) {
        Ok(term) => term,
        Err(e) => {
            tracing::warn!(error = %e, "failed to install SIGTERM handler");
            let _ = tokio::signal::ctrl_c().await;
            return "SIGINT";
        }
    };
    tokio::select! {
        _ = tokio::signal::ctrl_c() => "SIGINT",
        _ = term.recv() => "SIGTERM",
    }
}
