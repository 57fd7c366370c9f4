//! Terminal mode selection.
//!
//! Priority, first match wins:
//! 1. an eval wrapper is installed -> eval-wrapper loop
//! 2. no main module is bound -> REPL
//! 3. otherwise -> module execution, performed outside the sequencer

use std::fmt;

use crate::core::types::{EvalWrapper, ModuleLocation};

/// The execution strategy a process runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    EvalWrapper,
    Repl,
    Module,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Mode::EvalWrapper => "eval-wrapper",
            Mode::Repl => "repl",
            Mode::Module => "module",
        };
        f.write_str(label)
    }
}

/// Selected mode together with what it needs to run.
#[derive(Debug)]
pub enum Dispatch {
    EvalWrapper(EvalWrapper),
    Repl,
    Module(ModuleLocation),
}

impl Dispatch {
    pub fn mode(&self) -> Mode {
        match self {
            Dispatch::EvalWrapper(_) => Mode::EvalWrapper,
            Dispatch::Repl => Mode::Repl,
            Dispatch::Module(_) => Mode::Module,
        }
    }
}

/// Pick exactly one mode.
///
/// The wrapper wins even when a module is bound, so embedding code can run
/// snippets against a module context.
pub fn dispatch(eval_wrapper: Option<EvalWrapper>, location: Option<&ModuleLocation>) -> Dispatch {
    match (eval_wrapper, location) {
        (Some(wrapper), _) => Dispatch::EvalWrapper(wrapper),
        (None, None) => Dispatch::Repl,
        (None, Some(location)) => Dispatch::Module(location.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrapper() -> EvalWrapper {
        EvalWrapper::new("noop", |_| Ok(()))
    }

    #[test]
    fn wrapper_wins_over_bound_module() {
        let location = ModuleLocation::new("main.js");
        let selected = dispatch(Some(wrapper()), Some(&location));
        assert_eq!(selected.mode(), Mode::EvalWrapper);
    }

    #[test]
    fn wrapper_without_module_selects_wrapper() {
        assert_eq!(dispatch(Some(wrapper()), None).mode(), Mode::EvalWrapper);
    }

    #[test]
    fn nothing_to_run_selects_repl() {
        assert_eq!(dispatch(None, None).mode(), Mode::Repl);
    }

    #[test]
    fn bound_module_selects_module_with_location() {
        let location = ModuleLocation::new("main.js");
        match dispatch(None, Some(&location)) {
            Dispatch::Module(selected) => assert_eq!(selected, location),
            other => panic!("expected module dispatch, got {other:?}"),
        }
    }

    #[test]
    fn mode_labels() {
        assert_eq!(Mode::EvalWrapper.to_string(), "eval-wrapper");
        assert_eq!(Mode::Repl.to_string(), "repl");
        assert_eq!(Mode::Module.to_string(), "module");
    }
}
