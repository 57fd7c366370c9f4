use std::fmt;

use anyhow::Result;

/// Runtime and engine version identifiers reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versions {
    pub runtime: String,
    pub engine: String,
}

/// Bound main module location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleLocation(String);

impl ModuleLocation {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

type WrapperFn = dyn FnMut(&str) -> Result<()>;

/// Evaluation function installed by embedding code.
///
/// Its presence at dispatch time selects eval-wrapper mode. The sequencer never
/// creates one; it only decides whether to hand it to the eval-wrapper loop.
pub struct EvalWrapper {
    name: String,
    func: Box<WrapperFn>,
}

impl EvalWrapper {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: FnMut(&str) -> Result<()> + 'static,
    {
        Self {
            name: name.into(),
            func: Box::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluate one input item.
    pub fn call(&mut self, item: &str) -> Result<()> {
        (self.func)(item)
    }
}

impl fmt::Debug for EvalWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvalWrapper")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
