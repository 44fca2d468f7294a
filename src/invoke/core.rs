// src/invoke/core.rs

//! Pure per-invocation state machine.
//!
//! [`InvocationState`] consumes [`ProcessEvent`]s one at a time, grows the
//! stdout/stderr buffers, and settles a single [`Termination`]. It owns no
//! channels and runs no processes, so every ordering of events can be
//! exercised synchronously in tests. The async shell lives in
//! [`driver`](super::driver).

use tracing::{debug, warn};

use crate::invoke::decoder::Utf8StreamDecoder;
use crate::spawn::{ProcessEvent, SpawnError};
use crate::types::StreamKind;

/// Why a launch failure was reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// The spawner reported an error event (e.g. executable not found).
    Spawn,
    /// A stdout/stderr pipe failed while reading.
    Stream,
    /// The spawner broke its contract: a close with neither exit code nor
    /// signal, or no terminal event at all.
    Inconsistent,
}

/// Terminal classification of one invocation.
#[derive(Debug, Clone)]
pub enum Termination {
    /// The process exited on its own. Zero is success.
    CleanExit { code: i32 },
    /// The process was killed by a signal.
    SignalExit { signal: String },
    /// The process never ran to completion under our observation.
    LaunchFailure { error: SpawnError, fault: FaultKind },
}

impl Termination {
    pub fn phase(&self) -> InvocationPhase {
        match self {
            Termination::CleanExit { code: 0 } => InvocationPhase::Succeeded,
            Termination::CleanExit { .. } => InvocationPhase::FailedExit,
            Termination::SignalExit { .. } => InvocationPhase::FailedSignal,
            Termination::LaunchFailure { .. } => InvocationPhase::FailedLaunch,
        }
    }

    /// Classify a close event.
    pub fn from_close(code: Option<i32>, signal: Option<String>) -> Self {
        match (code, signal) {
            (Some(code), _) => Termination::CleanExit { code },
            (None, Some(signal)) => Termination::SignalExit { signal },
            (None, None) => Termination::LaunchFailure {
                error: SpawnError::new(
                    "close",
                    "process closed without an exit code or a signal",
                ),
                fault: FaultKind::Inconsistent,
            },
        }
    }
}

/// Lifecycle of an invocation. `Running` moves to one of the terminal
/// phases exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvocationPhase {
    #[default]
    Running,
    Succeeded,
    FailedExit,
    FailedSignal,
    FailedLaunch,
}

impl InvocationPhase {
    pub fn is_terminal(self) -> bool {
        !matches!(self, InvocationPhase::Running)
    }
}

/// Stdout and stderr text as captured when the invocation settled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Default)]
pub struct InvocationState {
    output: CapturedOutput,
    stdout_decoder: Utf8StreamDecoder,
    stderr_decoder: Utf8StreamDecoder,
    phase: InvocationPhase,
}

impl InvocationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> InvocationPhase {
        self.phase
    }

    pub fn output(&self) -> &CapturedOutput {
        &self.output
    }

    pub fn into_output(self) -> CapturedOutput {
        self.output
    }

    /// Apply one event.
    ///
    /// Returns the termination the first time a terminal event (or a stream
    /// fault) arrives. Every event after that is ignored and returns `None`;
    /// output buffers are frozen from that point on.
    pub fn step(&mut self, event: ProcessEvent) -> Option<Termination> {
        if self.phase.is_terminal() {
            if event.is_terminal() {
                warn!(phase = ?self.phase, ?event, "ignoring terminal event after settlement");
            } else {
                debug!(phase = ?self.phase, "ignoring stream event after settlement");
            }
            return None;
        }

        match event {
            ProcessEvent::Data { stream, chunk } => {
                self.append(stream, &chunk);
                None
            }
            ProcessEvent::StreamError { stream, error } => {
                warn!(%stream, error = %error, "output stream failed; settling as launch failure");
                Some(self.settle(Termination::LaunchFailure {
                    error,
                    fault: FaultKind::Stream,
                }))
            }
            ProcessEvent::Close { code, signal } => {
                Some(self.settle(Termination::from_close(code, signal)))
            }
            ProcessEvent::Error(error) => Some(self.settle(Termination::LaunchFailure {
                error,
                fault: FaultKind::Spawn,
            })),
        }
    }

    /// The event source ended without a terminal event.
    ///
    /// Only meaningful while still running; the driver stops reading as
    /// soon as [`step`](Self::step) returns a termination.
    pub fn end_of_events(&mut self) -> Termination {
        debug_assert!(!self.phase.is_terminal(), "end_of_events after settlement");
        warn!("event stream ended without close or error");
        self.settle(Termination::LaunchFailure {
            error: SpawnError::new("wait", "process event stream ended unexpectedly"),
            fault: FaultKind::Inconsistent,
        })
    }

    fn append(&mut self, stream: StreamKind, chunk: &[u8]) {
        match stream {
            StreamKind::Stdout => self.stdout_decoder.decode_into(chunk, &mut self.output.stdout),
            StreamKind::Stderr => self.stderr_decoder.decode_into(chunk, &mut self.output.stderr),
        }
    }

    fn settle(&mut self, termination: Termination) -> Termination {
        self.stdout_decoder.finish(&mut self.output.stdout);
        self.stderr_decoder.finish(&mut self.output.stderr);
        self.phase = termination.phase();
        debug!(phase = ?self.phase, "invocation settled");
        termination
    }
}
