// tests/invocation_core.rs

mod common;
use crate::common::init_tracing;

use procrun::invoke::{FaultKind, InvocationPhase, InvocationState, Termination};
use procrun::spawn::{ProcessEvent, SpawnError};
use procrun::StreamKind;
use procrun_test_utils::EventScript;

/// Feed events until the first termination, like the driver does.
fn run_script(events: Vec<ProcessEvent>) -> (Option<Termination>, InvocationState) {
    let mut state = InvocationState::new();
    let mut first = None;
    for event in events {
        if let Some(t) = state.step(event) {
            if first.is_none() {
                first = Some(t);
            }
        }
    }
    (first, state)
}

#[test]
fn interleaved_streams_fill_their_own_buffers() {
    init_tracing();

    let script = EventScript::new()
        .stdout("out-1 ")
        .stderr("err-1 ")
        .stdout("out-2")
        .stderr("err-2")
        .exit(0)
        .build();

    let (termination, state) = run_script(script);

    assert!(matches!(termination, Some(Termination::CleanExit { code: 0 })));
    assert_eq!(state.phase(), InvocationPhase::Succeeded);
    assert_eq!(state.output().stdout, "out-1 out-2");
    assert_eq!(state.output().stderr, "err-1 err-2");
}

#[test]
fn state_starts_running_with_empty_buffers() {
    let state = InvocationState::new();
    assert_eq!(state.phase(), InvocationPhase::Running);
    assert!(!state.phase().is_terminal());
    assert!(state.output().stdout.is_empty());
    assert!(state.output().stderr.is_empty());
}

#[test]
fn nonzero_exit_is_failed_exit() {
    let (termination, state) = run_script(EventScript::new().exit(3).build());

    assert!(matches!(termination, Some(Termination::CleanExit { code: 3 })));
    assert_eq!(state.phase(), InvocationPhase::FailedExit);
}

#[test]
fn null_code_with_signal_is_signal_exit() {
    let (termination, state) = run_script(EventScript::new().signal("SIGTERM").build());

    match termination {
        Some(Termination::SignalExit { signal }) => assert_eq!(signal, "SIGTERM"),
        other => panic!("expected SignalExit, got {:?}", other),
    }
    assert_eq!(state.phase(), InvocationPhase::FailedSignal);
}

#[test]
fn close_without_code_or_signal_is_an_inconsistent_launch_failure() {
    let (termination, state) = run_script(EventScript::new().close_without_status().build());

    match termination {
        Some(Termination::LaunchFailure { fault, .. }) => {
            assert_eq!(fault, FaultKind::Inconsistent)
        }
        other => panic!("expected LaunchFailure, got {:?}", other),
    }
    assert_eq!(state.phase(), InvocationPhase::FailedLaunch);
}

#[test]
fn error_event_is_spawn_launch_failure() {
    let error = SpawnError::new("spawn nope", "spawn nope ENOENT").with_code("ENOENT");
    let (termination, _) = run_script(EventScript::new().error(error).build());

    match termination {
        Some(Termination::LaunchFailure { error, fault }) => {
            assert_eq!(fault, FaultKind::Spawn);
            assert_eq!(error.code.as_deref(), Some("ENOENT"));
        }
        other => panic!("expected LaunchFailure, got {:?}", other),
    }
}

#[test]
fn stream_error_settles_with_stderr_so_far() {
    init_tracing();

    let script = EventScript::new()
        .stderr("partial")
        .stream_error(
            StreamKind::Stdout,
            SpawnError::new("read stdout", "read stdout EIO").with_code("EIO"),
        )
        .stderr(" ignored")
        .exit(0)
        .build();

    let (termination, state) = run_script(script);

    match termination {
        Some(Termination::LaunchFailure { fault, .. }) => assert_eq!(fault, FaultKind::Stream),
        other => panic!("expected stream fault, got {:?}", other),
    }
    assert_eq!(state.output().stderr, "partial");
    assert_eq!(state.phase(), InvocationPhase::FailedLaunch);
}

#[test]
fn second_terminal_event_is_a_no_op() {
    init_tracing();

    let mut state = InvocationState::new();
    assert!(state.step(ProcessEvent::Close { code: Some(0), signal: None }).is_some());

    let second = state.step(ProcessEvent::Error(SpawnError::new("spawn x", "late")));
    assert!(second.is_none());
    assert_eq!(state.phase(), InvocationPhase::Succeeded);

    let third = state.step(ProcessEvent::Close { code: Some(1), signal: None });
    assert!(third.is_none());
    assert_eq!(state.phase(), InvocationPhase::Succeeded);
}

#[test]
fn data_after_settlement_does_not_change_buffers() {
    let mut state = InvocationState::new();
    state.step(ProcessEvent::Data {
        stream: StreamKind::Stdout,
        chunk: b"before".to_vec(),
    });
    state.step(ProcessEvent::Close { code: Some(0), signal: None });
    state.step(ProcessEvent::Data {
        stream: StreamKind::Stdout,
        chunk: b"after".to_vec(),
    });

    assert_eq!(state.into_output().stdout, "before");
}

#[test]
fn split_character_across_data_events_is_decoded_once() {
    let script = EventScript::new()
        .stdout([0xe5u8, 0xa5])
        .stdout([0xbdu8])
        .exit(0)
        .build();

    let (_, state) = run_script(script);
    assert_eq!(state.output().stdout, "好");
}

#[test]
fn truncated_character_at_close_becomes_replacement() {
    let script = EventScript::new().stdout([b'a', 0xe5]).exit(0).build();

    let (_, state) = run_script(script);
    assert_eq!(state.output().stdout, "a\u{fffd}");
}

#[test]
fn end_of_events_without_terminal_is_inconsistent() {
    let mut state = InvocationState::new();
    state.step(ProcessEvent::Data {
        stream: StreamKind::Stderr,
        chunk: b"dying words".to_vec(),
    });

    match state.end_of_events() {
        Termination::LaunchFailure { fault, .. } => assert_eq!(fault, FaultKind::Inconsistent),
        other => panic!("expected LaunchFailure, got {:?}", other),
    }
    assert_eq!(state.phase(), InvocationPhase::FailedLaunch);
    assert_eq!(state.output().stderr, "dying words");
}
