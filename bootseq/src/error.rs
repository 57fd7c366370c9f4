//! Fatal bootstrap errors.
//!
//! Both kinds terminate the process. They are kept apart so the failure is
//! logged and reported with a distinct exit code.

use thiserror::Error;

use crate::core::start::StartMessageError;

#[derive(Debug, Error)]
pub enum BootError {
    /// The host call failed or produced no start message.
    #[error("handshake with host failed: {detail}")]
    Handshake { detail: String },
    /// The host sent a structurally invalid start message.
    #[error("invalid start message: {0}")]
    InvalidStartMessage(#[from] StartMessageError),
}
