//! Side-effecting adapters around the bootstrap core.

pub mod config;
pub mod engine;
pub mod host;
pub mod modes;
pub mod module;
pub mod process;
pub mod repl;
pub mod xeval;
