//! Process-wide runtime state bound during bootstrap.

use std::sync::OnceLock;

use thiserror::Error;

use crate::core::types::{ModuleLocation, Versions};

/// A write-once slot was written a second time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("runtime state '{slot}' is already bound")]
pub struct StateAlreadyBound {
    pub slot: &'static str,
}

/// Version identifiers and (optionally) the main module location.
///
/// Each slot is written at most once and never reset. Readers get shared
/// references; there is no writer after bootstrap.
#[derive(Debug, Default)]
pub struct RuntimeState {
    versions: OnceLock<Versions>,
    location: OnceLock<ModuleLocation>,
}

impl RuntimeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind_versions(&self, versions: Versions) -> Result<(), StateAlreadyBound> {
        self.versions
            .set(versions)
            .map_err(|_| StateAlreadyBound { slot: "versions" })
    }

    pub fn bind_location(&self, location: ModuleLocation) -> Result<(), StateAlreadyBound> {
        self.location
            .set(location)
            .map_err(|_| StateAlreadyBound { slot: "location" })
    }

    pub fn versions(&self) -> Option<&Versions> {
        self.versions.get()
    }

    /// Bound main module. `None` is the "no module" signal read by dispatch.
    pub fn location(&self) -> Option<&ModuleLocation> {
        self.location.get()
    }
}
