//! The host's one-shot startup message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Startup parameters returned by the host handshake.
///
/// Owned by the host and read-only to the sequencer. Field names are the
/// wire names used by JSON start messages.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StartResponse {
    /// Version of the runtime itself.
    pub runtime_version: String,
    /// Version of the embedded evaluation engine.
    pub engine_version: String,
    /// Set when the invocation asked for version identifiers only.
    #[serde(default)]
    pub version_flag: bool,
    /// Script to execute as the program. `None` means no module was given.
    #[serde(default)]
    pub main_module: Option<String>,
    /// Working directory resolved by the host.
    pub cwd: String,
    /// Raw argv. Element 0 is the invocation path and is not a user argument.
    pub argv: Vec<String>,
    /// Item delimiter for eval-wrapper mode.
    #[serde(default)]
    pub eval_delimiter: Option<String>,
}

/// Structurally invalid start message (a host contract violation).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartMessageError {
    #[error("main module path is present but empty")]
    EmptyMainModule,
}

impl StartResponse {
    /// Main module path, checked against the host contract.
    ///
    /// A present module path must be non-empty; anything else means the host
    /// sent a corrupt message and must not be recovered from.
    pub fn checked_main_module(&self) -> Result<Option<&str>, StartMessageError> {
        match self.main_module.as_deref() {
            Some("") => Err(StartMessageError::EmptyMainModule),
            other => Ok(other),
        }
    }
}
