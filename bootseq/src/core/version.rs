//! Version identifiers printed by `--version`.
//!
//! The runtime and engine versions come from the host; the toolchain version
//! is a compile-time table entry and is not part of the host contract.

use crate::core::types::Versions;

/// Version of this runtime build, reported by the command-line host.
pub const RUNTIME: &str = env!("CARGO_PKG_VERSION");

/// Bundled script toolchain version.
pub const TOOLCHAIN: &str = "3.4.1";

pub const RUNTIME_LABEL: &str = "deno";
pub const ENGINE_LABEL: &str = "v8";
pub const TOOLCHAIN_LABEL: &str = "typescript";

/// The three identifiers in output order: runtime, engine, toolchain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionReport<'a> {
    pub runtime: &'a str,
    pub engine: &'a str,
    pub toolchain: &'a str,
}

impl<'a> VersionReport<'a> {
    pub fn new(versions: &'a Versions) -> Self {
        Self {
            runtime: &versions.runtime,
            engine: &versions.engine,
            toolchain: TOOLCHAIN,
        }
    }

    /// `<label>: <value>` lines, without trailing newlines.
    pub fn lines(&self) -> [String; 3] {
        [
            format!("{RUNTIME_LABEL}: {}", self.runtime),
            format!("{ENGINE_LABEL}: {}", self.engine),
            format!("{TOOLCHAIN_LABEL}: {}", self.toolchain),
        ]
    }
}
