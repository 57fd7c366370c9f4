//! Long-running terminal modes entered at the end of bootstrap.
//!
//! The [`ModeRunner`] trait lets the sequencer enter a mode without knowing
//! how it is implemented. [`StdioModes`] runs both loops on the process's
//! standard streams; tests use recording runners.

use std::io;

use anyhow::Result;
use tracing::info;

use crate::core::types::EvalWrapper;
use crate::io::engine::Engine;
use crate::io::repl::LineRepl;
use crate::io::xeval::run_eval_loop;

/// Entry points for the two loop modes.
///
/// Each call owns the rest of the process's useful lifetime and returns when
/// its input is exhausted.
pub trait ModeRunner {
    /// Run `wrapper` over delimited input items.
    fn run_eval_wrapper(&mut self, wrapper: EvalWrapper, delimiter: Option<&str>) -> Result<()>;

    /// Run the interactive read-eval-print loop.
    fn run_repl(&mut self) -> Result<()>;
}

/// Runs the loops over stdin/stdout/stderr.
pub struct StdioModes<E> {
    engine: E,
    prompt: String,
}

impl<E: Engine> StdioModes<E> {
    pub fn new(engine: E, prompt: impl Into<String>) -> Self {
        Self {
            engine,
            prompt: prompt.into(),
        }
    }
}

impl<E: Engine> ModeRunner for StdioModes<E> {
    fn run_eval_wrapper(
        &mut self,
        mut wrapper: EvalWrapper,
        delimiter: Option<&str>,
    ) -> Result<()> {
        let delivered = run_eval_loop(io::stdin().lock(), &mut wrapper, delimiter)?;
        info!(delivered, "eval-wrapper loop finished");
        Ok(())
    }

    fn run_repl(&mut self) -> Result<()> {
        let summary = LineRepl::new(&self.engine, &self.prompt).run(
            io::stdin().lock(),
            io::stdout().lock(),
            io::stderr().lock(),
        )?;
        info!(
            evaluated = summary.evaluated,
            failed = summary.failed,
            "repl finished"
        );
        Ok(())
    }
}
