//! Module execution after bootstrap selected a main module.

use std::process::Stdio;

use anyhow::{Context, Result, anyhow};
use tracing::info;

use crate::core::types::ModuleLocation;
use crate::io::engine::CommandEngine;

/// Runs the bound main module with the frozen user args.
pub trait ModuleRunner {
    /// Run to completion and return the module's exit code.
    fn run_module(&self, location: &ModuleLocation, args: &[String]) -> Result<i32>;
}

impl ModuleRunner for CommandEngine {
    fn run_module(&self, location: &ModuleLocation, args: &[String]) -> Result<i32> {
        let mut cmd = Self::command(&self.config().module_command)?;
        cmd.arg(location.as_str())
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        info!(location = %location, args = args.len(), "running main module");
        let status = cmd
            .status()
            .with_context(|| format!("run module {location}"))?;
        status
            .code()
            .ok_or_else(|| anyhow!("module {location} terminated by signal"))
    }
}
