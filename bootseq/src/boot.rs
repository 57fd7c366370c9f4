//! Orchestration for process bootstrap.
//!
//! Stages run strictly in order, each at most once:
//!
//! 1. handshake with the host,
//! 2. version gate (`--version` prints and stops here),
//! 3. main module location binding,
//! 4. argument materialization,
//! 5. mode dispatch.
//!
//! Nothing from stages 3 to 5 (bound location, args, cwd/args diagnostics,
//! mode entry) happens when the version gate fires.

use std::io::Write;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::core::args::{ProcessArgs, materialize};
use crate::core::dispatch::{Dispatch, Mode, dispatch};
use crate::core::state::RuntimeState;
use crate::core::start::StartResponse;
use crate::core::types::{EvalWrapper, ModuleLocation, Versions};
use crate::core::version::VersionReport;
use crate::error::BootError;
use crate::io::host::Host;
use crate::io::modes::ModeRunner;

/// Inputs supplied by the embedder rather than the host.
#[derive(Debug, Default)]
pub struct BootRequest {
    /// Logical process name passed to the host for its diagnostics.
    pub process_name: Option<String>,
    /// Eval wrapper installed by prior initialization, if any.
    pub eval_wrapper: Option<EvalWrapper>,
}

/// Process-wide singletons written during bootstrap.
///
/// Created empty at process start. Bootstrap writes each piece once; after
/// that they are read-only.
#[derive(Debug, Default)]
pub struct ProcessGlobals {
    pub state: RuntimeState,
    pub args: ProcessArgs,
}

impl ProcessGlobals {
    pub fn new() -> Self {
        Self::default()
    }
}

/// How bootstrap ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootOutcome {
    /// Version identifiers were printed; the process should exit with 0.
    VersionReported,
    /// The eval-wrapper loop ran to completion.
    EvalWrapperFinished,
    /// The REPL ran to completion.
    ReplFinished,
    /// A main module was bound and is left for module execution.
    ModuleSelected(ModuleLocation),
}

impl BootOutcome {
    /// Mode the process ran under; `None` for the version short-circuit.
    pub fn mode(&self) -> Option<Mode> {
        match self {
            BootOutcome::VersionReported => None,
            BootOutcome::EvalWrapperFinished => Some(Mode::EvalWrapper),
            BootOutcome::ReplFinished => Some(Mode::Repl),
            BootOutcome::ModuleSelected(_) => Some(Mode::Module),
        }
    }
}

/// Run the bootstrap sequence.
///
/// Fatal conditions are returned as [`BootError`] inside the `anyhow` error so
/// callers can tell a failed handshake from a corrupt start message. Failures
/// of the REPL or eval-wrapper loop are ordinary errors with context.
pub fn bootstrap<H, M, W>(
    host: &H,
    request: BootRequest,
    modes: &mut M,
    stdout: &mut W,
    globals: &mut ProcessGlobals,
) -> Result<BootOutcome>
where
    H: Host + ?Sized,
    M: ModeRunner,
    W: Write,
{
    let BootRequest {
        process_name,
        eval_wrapper,
    } = request;

    let response = handshake(host, process_name.as_deref())?;
    let versions = Versions {
        runtime: response.runtime_version.clone(),
        engine: response.engine_version.clone(),
    };
    globals.state.bind_versions(versions.clone())?;

    if response.version_flag {
        report_versions(&VersionReport::new(&versions), stdout);
        return Ok(BootOutcome::VersionReported);
    }

    if let Some(path) = response
        .checked_main_module()
        .map_err(BootError::InvalidStartMessage)?
    {
        globals.state.bind_location(ModuleLocation::new(path))?;
        debug!(main_module = path, "location bound");
    }
    info!(cwd = %response.cwd, "cwd");

    materialize(&response.argv, &mut globals.args)?;
    info!(args = ?globals.args.as_slice(), "args");

    let selected = dispatch(eval_wrapper, globals.state.location());
    info!(mode = %selected.mode(), "mode selected");
    match selected {
        Dispatch::EvalWrapper(wrapper) => {
            modes
                .run_eval_wrapper(wrapper, response.eval_delimiter.as_deref())
                .context("eval-wrapper loop")?;
            Ok(BootOutcome::EvalWrapperFinished)
        }
        Dispatch::Repl => {
            modes.run_repl().context("repl loop")?;
            Ok(BootOutcome::ReplFinished)
        }
        Dispatch::Module(location) => Ok(BootOutcome::ModuleSelected(location)),
    }
}

fn handshake<H: Host + ?Sized>(host: &H, process_name: Option<&str>) -> Result<StartResponse> {
    debug!(process_name, "starting host handshake");
    let response = host.start(process_name).map_err(|err| BootError::Handshake {
        detail: format!("{err:#}"),
    })?;
    debug!(
        runtime_version = %response.runtime_version,
        engine_version = %response.engine_version,
        version_flag = response.version_flag,
        "handshake complete"
    );
    Ok(response)
}

/// Write the version lines. A broken stdout does not change the outcome.
fn report_versions<W: Write>(report: &VersionReport<'_>, stdout: &mut W) {
    for line in report.lines() {
        if let Err(err) = writeln!(stdout, "{line}") {
            warn!(err = %err, "failed to write version line");
            return;
        }
    }
    if let Err(err) = stdout.flush() {
        warn!(err = %err, "failed to flush version output");
    }
}
