//! Process-wide user argument list.
//!
//! The list starts empty and open, is filled once from the host's argv, and is
//! then frozen for the rest of the process. Appending to a frozen list is an
//! error, never a silent no-op.

use std::sync::Arc;

use thiserror::Error;

/// Attempted to append to a frozen argument list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("process args are frozen; cannot append '{arg}'")]
pub struct ArgsFrozen {
    pub arg: String,
}

#[derive(Debug)]
enum ArgsState {
    Open(Vec<String>),
    Frozen(Arc<[String]>),
}

/// User-visible process arguments (`argv[1..]`).
#[derive(Debug)]
pub struct ProcessArgs {
    state: ArgsState,
}

impl Default for ProcessArgs {
    fn default() -> Self {
        Self {
            state: ArgsState::Open(Vec::new()),
        }
    }
}

impl ProcessArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one argument. Fails once the list has been frozen.
    pub fn push(&mut self, arg: impl Into<String>) -> Result<(), ArgsFrozen> {
        match &mut self.state {
            ArgsState::Open(items) => {
                items.push(arg.into());
                Ok(())
            }
            ArgsState::Frozen(_) => Err(ArgsFrozen { arg: arg.into() }),
        }
    }

    /// Freeze the list and return a shared handle to it.
    ///
    /// Freezing an already frozen list returns the existing handle.
    pub fn freeze(&mut self) -> Arc<[String]> {
        let frozen = match &mut self.state {
            ArgsState::Frozen(items) => return Arc::clone(items),
            ArgsState::Open(items) => Arc::<[String]>::from(std::mem::take(items)),
        };
        self.state = ArgsState::Frozen(Arc::clone(&frozen));
        frozen
    }

    pub fn is_frozen(&self) -> bool {
        matches!(self.state, ArgsState::Frozen(_))
    }

    pub fn as_slice(&self) -> &[String] {
        match &self.state {
            ArgsState::Open(items) => items,
            ArgsState::Frozen(items) => items,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

/// Fill `args` from `argv[1..]` in order, then freeze it.
///
/// An empty `argv` (no invocation path) yields an empty list.
pub fn materialize(argv: &[String], args: &mut ProcessArgs) -> Result<Arc<[String]>, ArgsFrozen> {
    for arg in argv.iter().skip(1) {
        args.push(arg.as_str())?;
    }
    Ok(args.freeze())
}
