//! Bootstrap configuration (`bootseq.toml`).

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "bootseq.toml";

/// Sequencer and adapter configuration (TOML).
///
/// Missing fields take their defaults, so an empty file is a valid config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BootConfig {
    /// Logical process name passed to the host handshake.
    pub process_name: Option<String>,

    /// Fallback `tracing` filter when `RUST_LOG` is unset.
    pub log_filter: String,

    pub repl: ReplConfig,

    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReplConfig {
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine version reported by the command-line host.
    pub version: String,

    /// Evaluates a snippet; the snippet is appended as the last argument.
    pub eval_command: Vec<String>,

    /// Runs a module; the module path and user args are appended.
    pub module_command: Vec<String>,

    /// Wall-clock budget for a single snippet evaluation.
    pub timeout_secs: u64,

    /// Truncate captured evaluation output beyond this many bytes.
    pub output_limit_bytes: usize,
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            process_name: None,
            log_filter: "warn".to_string(),
            repl: ReplConfig::default(),
            engine: EngineConfig::default(),
        }
    }
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: "unknown".to_string(),
            eval_command: vec!["sh".to_string(), "-c".to_string()],
            module_command: vec!["sh".to_string()],
            timeout_secs: 30,
            output_limit_bytes: 100_000,
        }
    }
}

impl EngineConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl BootConfig {
    pub fn validate(&self) -> Result<()> {
        if self.log_filter.trim().is_empty() {
            return Err(anyhow!("log_filter must be non-empty"));
        }
        if self.engine.timeout_secs == 0 {
            return Err(anyhow!("engine.timeout_secs must be > 0"));
        }
        if self.engine.output_limit_bytes == 0 {
            return Err(anyhow!("engine.output_limit_bytes must be > 0"));
        }
        validate_command("engine.eval_command", &self.engine.eval_command)?;
        validate_command("engine.module_command", &self.engine.module_command)?;
        Ok(())
    }
}

fn validate_command(name: &str, command: &[String]) -> Result<()> {
    match command.first() {
        Some(program) if !program.trim().is_empty() => Ok(()),
        _ => Err(anyhow!("{name} must be a non-empty array")),
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `BootConfig::default()`.
pub fn load_config(path: &Path) -> Result<BootConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "config missing, using defaults");
        let cfg = BootConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: BootConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

/// Resolve the config for this process.
///
/// An explicit path must exist; the implicit `bootseq.toml` is optional.
pub fn resolve_config(explicit: Option<&Path>) -> Result<BootConfig> {
    match explicit {
        Some(path) if !path.exists() => Err(anyhow!("config {} not found", path.display())),
        Some(path) => load_config(path),
        None => load_config(Path::new(DEFAULT_CONFIG_FILE)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, BootConfig::default());
    }

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("bootseq.toml");
        fs::write(
            &path,
            "process_name = \"main\"\n\n[engine]\nversion = \"7.4.158\"\n",
        )
        .expect("write");

        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.process_name.as_deref(), Some("main"));
        assert_eq!(cfg.engine.version, "7.4.158");
        assert_eq!(cfg.engine.eval_command, vec!["sh", "-c"]);
        assert_eq!(cfg.repl.prompt, "> ");
    }

    #[test]
    fn validate_rejects_empty_commands_and_zero_limits() {
        let mut cfg = BootConfig::default();
        cfg.engine.eval_command = Vec::new();
        assert!(cfg.validate().is_err());

        let mut cfg = BootConfig::default();
        cfg.engine.module_command = vec!["  ".to_string()];
        assert!(cfg.validate().is_err());

        let mut cfg = BootConfig::default();
        cfg.engine.timeout_secs = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = BootConfig::default();
        cfg.log_filter = String::new();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let missing = temp.path().join("nope.toml");
        assert!(resolve_config(Some(&missing)).is_err());
    }
}
