//! Host abstraction for the startup handshake.
//!
//! The [`Host`] trait decouples the sequencer from where startup parameters
//! come from. [`CliHost`] derives them from the `bootseq` command line;
//! [`MessageHost`] reads a JSON start message written by an embedding host.
//! Tests use scripted hosts that return canned responses.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::validator_for;
use serde_json::Value;
use tracing::debug;

use crate::core::start::StartResponse;
use crate::core::version;

const START_MESSAGE_SCHEMA: &str = include_str!("../../schemas/start_message.schema.json");

/// Source of the one-shot start message.
pub trait Host {
    /// Block until the host produces startup parameters.
    ///
    /// `process_name` is passed through for the host's diagnostics.
    fn start(&self, process_name: Option<&str>) -> Result<StartResponse>;
}

/// Parsed command line handed to [`CliHost`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliInvocation {
    /// Invocation path (`argv[0]`).
    pub program: String,
    pub version_flag: bool,
    /// Main module followed by its arguments.
    pub positionals: Vec<String>,
    pub eval_delimiter: Option<String>,
}

/// Host backed by the `bootseq` command line and process environment.
///
/// The first positional becomes the main module and is not repeated in
/// `argv`: the response carries `[program, module args...]`, so a script
/// sees only its own arguments and the module runner appends the path once.
/// Hosts that report `[program, script, args...]` instead make the script
/// path the first user argument.
#[derive(Debug, Clone)]
pub struct CliHost {
    invocation: CliInvocation,
    engine_version: String,
}

impl CliHost {
    pub fn new(invocation: CliInvocation, engine_version: impl Into<String>) -> Self {
        Self {
            invocation,
            engine_version: engine_version.into(),
        }
    }

    fn response_for_cwd(&self, cwd: &Path) -> StartResponse {
        let CliInvocation {
            program,
            version_flag,
            positionals,
            eval_delimiter,
        } = &self.invocation;

        // argv[0] is the invocation path; user args are what follows the main module.
        let mut argv = vec![program.clone()];
        argv.extend(positionals.iter().skip(1).cloned());

        StartResponse {
            runtime_version: version::RUNTIME.to_string(),
            engine_version: self.engine_version.clone(),
            version_flag: *version_flag,
            main_module: positionals.first().cloned(),
            cwd: cwd.display().to_string(),
            argv,
            eval_delimiter: eval_delimiter.clone(),
        }
    }
}

impl Host for CliHost {
    fn start(&self, process_name: Option<&str>) -> Result<StartResponse> {
        debug!(process_name, program = %self.invocation.program, "cli host start");
        let cwd = std::env::current_dir().context("resolve working directory")?;
        Ok(self.response_for_cwd(&cwd))
    }
}

/// Host that hands over a JSON start message through a file.
#[derive(Debug, Clone)]
pub struct MessageHost {
    path: PathBuf,
}

impl MessageHost {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Host for MessageHost {
    fn start(&self, process_name: Option<&str>) -> Result<StartResponse> {
        debug!(process_name, path = %self.path.display(), "reading start message");
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("read start message {}", self.path.display()))?;
        parse_start_message(&contents)
            .with_context(|| format!("load start message {}", self.path.display()))
    }
}

/// Parse a JSON start message (schema check, then deserialize).
pub fn parse_start_message(contents: &str) -> Result<StartResponse> {
    if contents.trim().is_empty() {
        bail!("host returned no start message");
    }
    let value: Value = serde_json::from_str(contents).context("parse start message json")?;
    validate_schema(&value)?;
    serde_json::from_value(value).context("deserialize start message")
}

fn validate_schema(message: &Value) -> Result<()> {
    let schema: Value =
        serde_json::from_str(START_MESSAGE_SCHEMA).context("parse start message schema")?;
    let compiled = validator_for(&schema).map_err(|err| anyhow!("invalid schema: {}", err))?;
    if !compiled.is_valid(message) {
        let messages = compiled
            .iter_errors(message)
            .map(|err| err.to_string())
            .collect::<Vec<_>>();
        bail!(
            "start message schema validation failed: {}",
            messages.join("; ")
        );
    }
    Ok(())
}
