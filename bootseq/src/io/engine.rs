//! Engine abstraction for snippet evaluation.
//!
//! The [`Engine`] trait decouples the REPL and eval-wrapper adapters from the
//! evaluation backend. [`CommandEngine`] delegates to a configured external
//! interpreter; tests use in-memory engines.

use std::process::Command;

use anyhow::{Result, bail};
use tracing::{debug, instrument};

use crate::io::config::EngineConfig;
use crate::io::process::{CaptureLimits, run_captured};

/// Evaluates source snippets.
pub trait Engine {
    /// Evaluate `source`, optionally feeding `input` on the snippet's stdin.
    ///
    /// Returns what the snippet printed.
    fn eval(&self, source: &str, input: Option<&str>) -> Result<String>;
}

/// Engine backed by an external interpreter process.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    config: EngineConfig,
}

impl CommandEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build a command from a configured `[program, args...]` array.
    pub(crate) fn command(argv: &[String]) -> Result<Command> {
        let Some((program, args)) = argv.split_first() else {
            bail!("engine command is empty");
        };
        let mut cmd = Command::new(program);
        cmd.args(args);
        Ok(cmd)
    }
}

impl Engine for CommandEngine {
    #[instrument(
        skip_all,
        fields(source_bytes = source.len(), has_input = input.is_some())
    )]
    fn eval(&self, source: &str, input: Option<&str>) -> Result<String> {
        let mut cmd = Self::command(&self.config.eval_command)?;
        cmd.arg(source);

        let output = run_captured(
            cmd,
            input.map(str::as_bytes),
            CaptureLimits {
                timeout: self.config.timeout(),
                output_limit_bytes: self.config.output_limit_bytes,
            },
        )?;

        if output.timed_out {
            bail!("evaluation timed out after {}s", self.config.timeout_secs);
        }
        if !output.status.success() {
            bail!(
                "evaluation failed ({}): {}",
                output.status,
                output.stderr_lossy()
            );
        }
        debug!(stdout_bytes = output.stdout.len(), "evaluation finished");
        Ok(output.stdout_lossy())
    }
}
