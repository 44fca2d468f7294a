// src/render/errors.rs

//! Structured failures returned by [`spawn`](crate::invoke::spawn).
//!
//! Each error's `Display` is its full rendered message, which already
//! contains the rendered command and the captured output, so logging just
//! the error is enough to diagnose it.

use thiserror::Error;

use crate::invoke::FaultKind;
use crate::spawn::SpawnError;

/// The process could not be started, or its output could not be read.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct LaunchError {
    pub cmd: String,
    pub args: Vec<String>,
    /// The spawner's error after any `update_error` hook ran.
    pub original_error: SpawnError,
    pub fault: FaultKind,
    pub stdout: String,
    pub stderr: String,
    pub message: String,
}

/// The process exited with a non-zero status code.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct ExitCodeError {
    pub cmd: String,
    pub args: Vec<String>,
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
    pub message: String,
}

/// The process was terminated by a signal.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct ExitSignalError {
    pub cmd: String,
    pub args: Vec<String>,
    pub signal: String,
    pub stdout: String,
    pub stderr: String,
    pub message: String,
}

/// Any failed invocation.
#[derive(Error, Debug, Clone)]
pub enum InvokeError {
    #[error(transparent)]
    Launch(#[from] LaunchError),

    #[error(transparent)]
    ExitCode(#[from] ExitCodeError),

    #[error(transparent)]
    ExitSignal(#[from] ExitSignalError),
}

impl InvokeError {
    pub fn message(&self) -> &str {
        match self {
            InvokeError::Launch(e) => &e.message,
            InvokeError::ExitCode(e) => &e.message,
            InvokeError::ExitSignal(e) => &e.message,
        }
    }

    pub fn cmd(&self) -> &str {
        match self {
            InvokeError::Launch(e) => &e.cmd,
            InvokeError::ExitCode(e) => &e.cmd,
            InvokeError::ExitSignal(e) => &e.cmd,
        }
    }

    pub fn args(&self) -> &[String] {
        match self {
            InvokeError::Launch(e) => &e.args,
            InvokeError::ExitCode(e) => &e.args,
            InvokeError::ExitSignal(e) => &e.args,
        }
    }

    pub fn stdout(&self) -> &str {
        match self {
            InvokeError::Launch(e) => &e.stdout,
            InvokeError::ExitCode(e) => &e.stdout,
            InvokeError::ExitSignal(e) => &e.stdout,
        }
    }

    pub fn stderr(&self) -> &str {
        match self {
            InvokeError::Launch(e) => &e.stderr,
            InvokeError::ExitCode(e) => &e.stderr,
            InvokeError::ExitSignal(e) => &e.stderr,
        }
    }

    /// Exit code of the child, for non-zero exits.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            InvokeError::ExitCode(e) => Some(e.code),
            _ => None,
        }
    }

    /// Signal name, for signal terminations.
    pub fn signal(&self) -> Option<&str> {
        match self {
            InvokeError::ExitSignal(e) => Some(&e.signal),
            _ => None,
        }
    }
}
