//! Stable exit codes for the `bootseq` binary.

use crate::error::BootError;

/// Bootstrap finished, including the `--version` short-circuit.
pub const OK: i32 = 0;
/// Any failure outside the bootstrap core (config, REPL/eval loop, module runner).
pub const FAILED: i32 = 1;
/// The host handshake failed (`EX_UNAVAILABLE`).
pub const HANDSHAKE_FAILED: i32 = 69;
/// The host sent an invalid start message (`EX_PROTOCOL`).
pub const INVALID_START_MESSAGE: i32 = 76;

/// Map a top-level error to its exit code.
pub fn for_error(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<BootError>() {
        Some(BootError::Handshake { .. }) => HANDSHAKE_FAILED,
        Some(BootError::InvalidStartMessage(_)) => INVALID_START_MESSAGE,
        None => FAILED,
    }
}
