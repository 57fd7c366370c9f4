//! Test-only hosts, mode runners and fixtures.

use std::cell::{Cell, RefCell};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use tempfile::TempDir;

use crate::core::start::StartResponse;
use crate::core::types::EvalWrapper;
use crate::io::host::Host;
use crate::io::modes::ModeRunner;

/// Deterministic start response with `argv = ["bootseq", args...]`.
pub fn start_response(args: &[&str]) -> StartResponse {
    let mut argv = vec!["bootseq".to_string()];
    argv.extend(args.iter().map(|arg| arg.to_string()));
    StartResponse {
        runtime_version: "0.4.0".to_string(),
        engine_version: "7.4.158".to_string(),
        version_flag: false,
        main_module: None,
        cwd: "/work".to_string(),
        argv,
        eval_delimiter: None,
    }
}

/// Same as [`start_response`], with a main module set.
pub fn module_response(main_module: &str, args: &[&str]) -> StartResponse {
    StartResponse {
        main_module: Some(main_module.to_string()),
        ..start_response(args)
    }
}

/// Host that returns a canned response (or failure) and records each call.
pub struct ScriptedHost {
    response: Result<StartResponse, String>,
    calls: Cell<usize>,
    names: RefCell<Vec<Option<String>>>,
}

impl ScriptedHost {
    pub fn new(response: StartResponse) -> Self {
        Self {
            response: Ok(response),
            calls: Cell::new(0),
            names: RefCell::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            calls: Cell::new(0),
            names: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// Process names passed to each call, in order.
    pub fn names(&self) -> Vec<Option<String>> {
        self.names.borrow().clone()
    }
}

impl Host for ScriptedHost {
    fn start(&self, process_name: Option<&str>) -> Result<StartResponse> {
        self.calls.set(self.calls.get() + 1);
        self.names
            .borrow_mut()
            .push(process_name.map(str::to_string));
        self.response.clone().map_err(|message| anyhow!(message))
    }
}

/// A mode entry observed by [`RecordingModes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entered {
    EvalWrapper {
        wrapper: String,
        delimiter: Option<String>,
    },
    Repl,
}

/// Mode runner that records entries instead of reading stdin.
///
/// The eval wrapper is called once per `wrapper_items` entry so tests can
/// observe that the installed wrapper is the one handed to the loop.
#[derive(Debug, Default)]
pub struct RecordingModes {
    pub entered: Vec<Entered>,
    pub wrapper_items: Vec<String>,
    pub fail_repl: bool,
}

impl ModeRunner for RecordingModes {
    fn run_eval_wrapper(
        &mut self,
        mut wrapper: EvalWrapper,
        delimiter: Option<&str>,
    ) -> Result<()> {
        self.entered.push(Entered::EvalWrapper {
            wrapper: wrapper.name().to_string(),
            delimiter: delimiter.map(str::to_string),
        });
        for item in &self.wrapper_items {
            wrapper.call(item)?;
        }
        Ok(())
    }

    fn run_repl(&mut self) -> Result<()> {
        self.entered.push(Entered::Repl);
        if self.fail_repl {
            return Err(anyhow!("repl input closed unexpectedly"));
        }
        Ok(())
    }
}

/// Run `f` with a scoped `tracing` subscriber and return its formatted output.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buf = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&buf);
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || SharedWriter(Arc::clone(&sink)))
        .finish();

    let value = tracing::subscriber::with_default(subscriber, f);
    let bytes = buf.lock().expect("log buffer").clone();
    (value, String::from_utf8_lossy(&bytes).into_owned())
}

struct SharedWriter(Arc<Mutex<Vec<u8>>>);

impl Write for SharedWriter {
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        self.0.lock().expect("log buffer").extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// A start message written to a temporary file.
pub struct StartMessageFile {
    _dir: TempDir,
    path: PathBuf,
}

impl StartMessageFile {
    pub fn new(response: &StartResponse) -> Result<Self> {
        Self::raw(&serde_json::to_string_pretty(response)?)
    }

    pub fn raw(contents: &str) -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("start.json");
        std::fs::write(&path, contents)?;
        Ok(Self { _dir: dir, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
