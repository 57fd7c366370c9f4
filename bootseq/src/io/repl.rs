//! Line-oriented read-eval-print loop.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::io::engine::Engine;

const HELP: &str = "\
.help    show this help
.exit    leave the repl (also: exit, end of input)
";

/// Counters reported when the REPL ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplSummary {
    pub evaluated: usize,
    pub failed: usize,
}

/// Reads one snippet per line and prints the engine's result.
///
/// Evaluation errors are reported on the error stream and the loop keeps going;
/// only I/O failures on the REPL's own streams end it with an error.
pub struct LineRepl<'a, E> {
    engine: &'a E,
    prompt: &'a str,
}

impl<'a, E: Engine> LineRepl<'a, E> {
    pub fn new(engine: &'a E, prompt: &'a str) -> Self {
        Self { engine, prompt }
    }

    pub fn run<R, W, X>(&self, mut input: R, mut out: W, mut err: X) -> Result<ReplSummary>
    where
        R: BufRead,
        W: Write,
        X: Write,
    {
        let mut summary = ReplSummary::default();
        loop {
            write!(out, "{}", self.prompt).context("write prompt")?;
            out.flush().context("flush prompt")?;

            let mut line = String::new();
            if input.read_line(&mut line).context("read repl input")? == 0 {
                writeln!(out).context("write newline")?;
                break;
            }

            match line.trim() {
                "" => continue,
                ".exit" | "exit" => break,
                ".help" => out.write_all(HELP.as_bytes()).context("write help")?,
                source => match self.engine.eval(source, None) {
                    Ok(result) => {
                        summary.evaluated += 1;
                        out.write_all(result.as_bytes()).context("write result")?;
                    }
                    Err(eval_err) => {
                        summary.failed += 1;
                        warn!(err = %eval_err, "repl evaluation failed");
                        writeln!(err, "error: {eval_err:#}").context("write error")?;
                    }
                },
            }
        }
        debug!(
            evaluated = summary.evaluated,
            failed = summary.failed,
            "repl finished"
        );
        Ok(summary)
    }
}
