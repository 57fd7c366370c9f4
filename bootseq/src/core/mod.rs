//! Deterministic, pure logic shared by the bootstrap sequencer.
//!
//! Core modules perform no I/O. They own the startup data model and the
//! decisions made over it, and return deterministic outputs suitable for tests.

pub mod args;
pub mod dispatch;
pub mod start;
pub mod state;
pub mod types;
pub mod version;
