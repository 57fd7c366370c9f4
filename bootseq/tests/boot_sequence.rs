//! Bootstrap sequencing tests.
//!
//! Drive `bootstrap` with scripted hosts and recording mode runners to check
//! stage ordering, the version short-circuit, the main module contract,
//! argument freezing, and mode priority.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use bootseq::boot::{BootOutcome, BootRequest, ProcessGlobals, bootstrap};
use bootseq::core::dispatch::Mode;
use bootseq::core::start::StartMessageError;
use bootseq::core::types::EvalWrapper;
use bootseq::core::version::TOOLCHAIN;
use bootseq::error::BootError;
use bootseq::test_support::{
    Entered, RecordingModes, ScriptedHost, capture_logs, module_response, start_response,
};

struct Run {
    result: anyhow::Result<BootOutcome>,
    stdout: String,
    modes: RecordingModes,
    globals: ProcessGlobals,
}

fn run(host: &ScriptedHost, request: BootRequest) -> Run {
    run_with(host, request, RecordingModes::default())
}

fn run_with(host: &ScriptedHost, request: BootRequest, mut modes: RecordingModes) -> Run {
    let mut stdout = Vec::new();
    let mut globals = ProcessGlobals::new();
    let result = bootstrap(host, request, &mut modes, &mut stdout, &mut globals);
    Run {
        result,
        stdout: String::from_utf8(stdout).expect("utf8 stdout"),
        modes,
        globals,
    }
}

fn wrapper(name: &str) -> EvalWrapper {
    EvalWrapper::new(name, |_| Ok(()))
}

fn versions_requested(mut response: bootseq::core::start::StartResponse) -> ScriptedHost {
    response.version_flag = true;
    ScriptedHost::new(response)
}

#[test]
fn version_flag_prints_three_lines_and_stops() {
    let host = versions_requested(module_response("main.js", &["a", "b"]));
    let run = run(
        &host,
        BootRequest {
            process_name: None,
            eval_wrapper: Some(wrapper("xeval")),
        },
    );

    assert_eq!(run.result.expect("boot"), BootOutcome::VersionReported);
    assert_eq!(
        run.stdout,
        format!("deno: 0.4.0\nv8: 7.4.158\ntypescript: {TOOLCHAIN}\n")
    );
    assert!(run.globals.state.location().is_none());
    assert!(run.globals.args.is_empty());
    assert!(!run.globals.args.is_frozen());
    assert!(run.modes.entered.is_empty());
}

#[test]
fn version_flag_wins_over_an_empty_main_module() {
    let host = versions_requested(module_response("", &[]));
    let run = run(&host, BootRequest::default());

    assert_eq!(run.result.expect("boot"), BootOutcome::VersionReported);
    assert_eq!(run.stdout.lines().count(), 3);
    assert!(run.globals.state.location().is_none());
}

#[test]
fn version_flag_emits_no_cwd_or_args_diagnostics() {
    let host = versions_requested(start_response(&["a"]));
    let (run, logs) = capture_logs(|| run(&host, BootRequest::default()));

    assert!(run.result.is_ok());
    assert!(!logs.contains("cwd="), "unexpected cwd log: {logs}");
    assert!(!logs.contains("args="), "unexpected args log: {logs}");
}

#[test]
fn normal_boot_logs_cwd_then_args() {
    let host = ScriptedHost::new(module_response("main.js", &["a"]));
    let (run, logs) = capture_logs(|| run(&host, BootRequest::default()));

    assert!(run.result.is_ok());
    let cwd = logs.find("cwd=/work").expect("cwd logged");
    let args = logs.find("args=[\"a\"]").expect("args logged");
    assert!(cwd < args);
}

struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }
}

#[test]
fn broken_stdout_on_version_flag_is_logged_not_fatal() {
    let host = versions_requested(module_response("main.js", &["a"]));
    let mut modes = RecordingModes::default();
    let mut globals = ProcessGlobals::new();

    let (result, logs) = capture_logs(|| {
        bootstrap(
            &host,
            BootRequest::default(),
            &mut modes,
            &mut BrokenPipe,
            &mut globals,
        )
    });

    assert_eq!(result.expect("boot"), BootOutcome::VersionReported);
    assert!(logs.contains("WARN"), "missing warn: {logs}");
    assert!(logs.contains("failed to write version line"), "{logs}");
    assert!(globals.state.versions().is_some());
    assert!(globals.state.location().is_none());
    assert!(globals.args.is_empty());
    assert!(modes.entered.is_empty());
}

#[test]
fn main_module_is_bound_and_module_mode_selected() {
    let host = ScriptedHost::new(module_response("main.js", &["x"]));
    let run = run(&host, BootRequest::default());

    let outcome = run.result.expect("boot");
    assert_eq!(outcome.mode(), Some(Mode::Module));
    match outcome {
        BootOutcome::ModuleSelected(location) => assert_eq!(location.as_str(), "main.js"),
        other => panic!("expected module outcome, got {other:?}"),
    }
    assert_eq!(
        run.globals.state.location().map(|l| l.as_str()),
        Some("main.js")
    );
    assert!(run.modes.entered.is_empty());
    assert!(run.stdout.is_empty());
}

#[test]
fn empty_main_module_aborts_before_any_mode() {
    let host = ScriptedHost::new(module_response("", &["a"]));
    let run = run(
        &host,
        BootRequest {
            process_name: None,
            eval_wrapper: Some(wrapper("xeval")),
        },
    );

    let err = run.result.expect_err("empty module");
    match err.downcast_ref::<BootError>() {
        Some(BootError::InvalidStartMessage(StartMessageError::EmptyMainModule)) => {}
        other => panic!("expected invalid start message, got {other:?}"),
    }
    assert!(run.modes.entered.is_empty());
    assert!(run.globals.state.location().is_none());
    assert!(run.globals.args.is_empty());
}

#[test]
fn args_are_argv_tail_in_order_and_frozen() {
    let host = ScriptedHost::new(module_response("main.js", &["--flag", "b", "c"]));
    let mut run = run(&host, BootRequest::default());

    assert!(run.result.is_ok());
    assert_eq!(run.globals.args.as_slice(), &["--flag", "b", "c"]);
    assert!(run.globals.args.is_frozen());
    assert!(run.globals.args.push("late").is_err());
    assert_eq!(run.globals.args.len(), 3);
}

#[test]
fn no_module_and_no_wrapper_enters_repl_once() {
    let host = ScriptedHost::new(start_response(&[]));
    let run = run(&host, BootRequest::default());

    assert_eq!(run.result.expect("boot"), BootOutcome::ReplFinished);
    assert_eq!(run.modes.entered, vec![Entered::Repl]);
    assert!(run.globals.args.is_frozen());
}

#[test]
fn wrapper_takes_priority_over_main_module() {
    let mut response = module_response("main.js", &[]);
    response.eval_delimiter = Some(";".to_string());
    let host = ScriptedHost::new(response);
    let run = run(
        &host,
        BootRequest {
            process_name: None,
            eval_wrapper: Some(wrapper("xeval")),
        },
    );

    assert_eq!(run.result.expect("boot"), BootOutcome::EvalWrapperFinished);
    assert_eq!(
        run.modes.entered,
        vec![Entered::EvalWrapper {
            wrapper: "xeval".to_string(),
            delimiter: Some(";".to_string()),
        }]
    );
    // The module is still bound for the wrapper's context.
    assert_eq!(
        run.globals.state.location().map(|l| l.as_str()),
        Some("main.js")
    );
}

#[test]
fn installed_wrapper_is_the_one_called() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let wrapper = EvalWrapper::new("record", move |item| {
        sink.borrow_mut().push(item.to_string());
        Ok(())
    });
    let host = ScriptedHost::new(start_response(&[]));
    let modes = RecordingModes {
        wrapper_items: vec!["1".to_string(), "2".to_string()],
        ..RecordingModes::default()
    };

    let run = run_with(
        &host,
        BootRequest {
            process_name: None,
            eval_wrapper: Some(wrapper),
        },
        modes,
    );

    assert!(run.result.is_ok());
    assert_eq!(*seen.borrow(), vec!["1", "2"]);
}

#[test]
fn handshake_happens_once_with_process_name() {
    let host = ScriptedHost::new(start_response(&[]));
    let run = run(
        &host,
        BootRequest {
            process_name: Some("main".to_string()),
            eval_wrapper: None,
        },
    );

    assert!(run.result.is_ok());
    assert_eq!(host.calls(), 1);
    assert_eq!(host.names(), vec![Some("main".to_string())]);
}

#[test]
fn handshake_failure_is_fatal_and_nothing_else_runs() {
    let host = ScriptedHost::failing("host went away");
    let run = run(&host, BootRequest::default());

    let err = run.result.expect_err("handshake");
    match err.downcast_ref::<BootError>() {
        Some(BootError::Handshake { detail }) => assert!(detail.contains("host went away")),
        other => panic!("expected handshake error, got {other:?}"),
    }
    assert_eq!(host.calls(), 1);
    assert!(run.globals.state.versions().is_none());
    assert!(run.modes.entered.is_empty());
    assert!(run.stdout.is_empty());
}

#[test]
fn versions_are_bound_at_handshake() {
    let host = ScriptedHost::new(start_response(&[]));
    let run = run(&host, BootRequest::default());

    assert!(run.result.is_ok());
    let versions = run.globals.state.versions().expect("versions bound");
    assert_eq!(versions.runtime, "0.4.0");
    assert_eq!(versions.engine, "7.4.158");
}

#[test]
fn repl_failure_is_not_a_boot_error() {
    let host = ScriptedHost::new(start_response(&[]));
    let modes = RecordingModes {
        fail_repl: true,
        ..RecordingModes::default()
    };
    let run = run_with(&host, BootRequest::default(), modes);

    let err = run.result.expect_err("repl failure");
    assert!(err.downcast_ref::<BootError>().is_none());
    assert!(format!("{err:#}").contains("repl loop"));
}

#[test]
fn globals_cannot_be_bootstrapped_twice() {
    let host = ScriptedHost::new(start_response(&["a"]));
    let mut modes = RecordingModes::default();
    let mut globals = ProcessGlobals::new();
    let mut stdout = Vec::new();

    bootstrap(
        &host,
        BootRequest::default(),
        &mut modes,
        &mut stdout,
        &mut globals,
    )
    .expect("first boot");
    let err = bootstrap(
        &host,
        BootRequest::default(),
        &mut modes,
        &mut stdout,
        &mut globals,
    )
    .expect_err("second boot");

    assert!(format!("{err:#}").contains("already bound"));
    assert_eq!(globals.args.as_slice(), &["a"]);
    assert_eq!(modes.entered, vec![Entered::Repl]);
}
