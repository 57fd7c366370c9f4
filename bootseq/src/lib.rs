//! Process bootstrap sequencer for a scripting runtime.
//!
//! Runs once per process and decides, from the host's start message, which
//! execution mode the process runs under. The crate is split the same way
//! throughout:
//!
//! - **[`core`]**: Pure, deterministic data model and decisions (start message
//!   contract, frozen args, write-once runtime state, mode selection).
//! - **[`io`]**: Side-effecting adapters (hosts, engine processes, REPL and
//!   eval-wrapper loops, configuration).
//!
//! [`boot`] sequences the stages: handshake, version gate, location binding,
//! argument materialization, and mode dispatch.

pub mod boot;
pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
