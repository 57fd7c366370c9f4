//! `bootseq`: run a script, an eval wrapper, or a REPL.
//!
//! The binary acts as the host: it turns its own command line (or a JSON start
//! message) into the startup handshake, runs the bootstrap sequencer, and
//! executes the main module when bootstrap leaves that to it.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

use bootseq::boot::{BootOutcome, BootRequest, ProcessGlobals, bootstrap};
use bootseq::core::types::EvalWrapper;
use bootseq::error::BootError;
use bootseq::exit_codes;
use bootseq::io::config::resolve_config;
use bootseq::io::engine::{CommandEngine, Engine};
use bootseq::io::host::{CliHost, CliInvocation, Host, MessageHost};
use bootseq::io::modes::StdioModes;
use bootseq::io::module::ModuleRunner;
use bootseq::logging;

#[derive(Parser)]
#[command(
    name = "bootseq",
    about = "Process bootstrap sequencer for a scripting runtime",
    disable_version_flag = true
)]
struct Cli {
    /// Print runtime, engine and toolchain versions, then exit.
    #[arg(short = 'v', long = "version")]
    version: bool,

    /// Enable debug diagnostics on stderr (unless `RUST_LOG` is set).
    #[arg(short = 'D', long)]
    log_debug: bool,

    /// Config file (default: `bootseq.toml` in the working directory, if present).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Read the start message from a JSON file instead of this command line.
    ///
    /// The file then supplies the version flag, delimiter and argv.
    #[arg(
        long,
        value_name = "PATH",
        conflicts_with_all = ["version", "delim", "positionals"]
    )]
    start_message: Option<PathBuf>,

    /// Evaluate SNIPPET once per stdin item (the item is fed on the snippet's stdin).
    #[arg(long, value_name = "SNIPPET")]
    xeval: Option<String>,

    /// Item delimiter for `--xeval` (default: newline).
    #[arg(short = 'I', long, value_name = "DELIM")]
    delim: Option<String>,

    /// Main module followed by its arguments.
    #[arg(value_name = "MAIN_MODULE", trailing_var_arg = true)]
    positionals: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    let code = match run(cli) {
        Ok(code) => code,
        Err(err) => report_fatal(&err),
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<i32> {
    let config = resolve_config(cli.config.as_deref())?;
    logging::init(if cli.log_debug {
        "debug"
    } else {
        config.log_filter.as_str()
    });

    let engine = CommandEngine::new(config.engine.clone());
    let host: Box<dyn Host> = match &cli.start_message {
        Some(path) => Box::new(MessageHost::new(path)),
        None => Box::new(CliHost::new(
            CliInvocation {
                program: std::env::args().next().unwrap_or_else(|| "bootseq".to_string()),
                version_flag: cli.version,
                positionals: cli.positionals,
                eval_delimiter: cli.delim,
            },
            config.engine.version.clone(),
        )),
    };
    let request = BootRequest {
        process_name: config.process_name.clone(),
        eval_wrapper: cli
            .xeval
            .map(|snippet| xeval_wrapper(engine.clone(), snippet)),
    };

    let mut modes = StdioModes::new(engine.clone(), config.repl.prompt.clone());
    let mut globals = ProcessGlobals::new();
    let outcome = bootstrap(
        host.as_ref(),
        request,
        &mut modes,
        &mut io::stdout(),
        &mut globals,
    )?;

    match outcome {
        BootOutcome::ModuleSelected(location) => engine
            .run_module(&location, globals.args.as_slice())
            .context("module execution"),
        BootOutcome::VersionReported
        | BootOutcome::EvalWrapperFinished
        | BootOutcome::ReplFinished => Ok(exit_codes::OK),
    }
}

/// Wrapper that evaluates `snippet` with each item on its stdin.
fn xeval_wrapper(engine: CommandEngine, snippet: String) -> EvalWrapper {
    EvalWrapper::new("xeval", move |item| {
        let output = engine.eval(&snippet, Some(item))?;
        let mut stdout = io::stdout().lock();
        stdout.write_all(output.as_bytes()).context("write xeval output")?;
        stdout.flush().context("flush xeval output")
    })
}

fn report_fatal(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<BootError>() {
        Some(BootError::Handshake { .. }) => {
            error!(err = %format!("{err:#}"), "handshake failed");
        }
        Some(BootError::InvalidStartMessage(_)) => {
            error!(err = %format!("{err:#}"), "invalid start message");
        }
        None => error!(err = %format!("{err:#}"), "bootseq failed"),
    }
    eprintln!("bootseq: {err:#}");
    exit_codes::for_error(err)
}
