// src/spawn/mod.rs

//! Process creation layer.
//!
//! The invocation driver never touches `tokio::process` directly. It asks a
//! [`Spawner`] to start a process and then consumes the [`ProcessEvent`]s the
//! spawner emits on a channel:
//!
//! - [`tokio_spawner`] is the production implementation built on
//!   `tokio::process::Command`.
//! - [`error`] defines [`SpawnError`], the underlying error object carried by
//!   launch failures and stream faults.
//! - [`signal`] maps raw exit statuses to signal names.
//!
//! Tests can provide their own `Spawner` that replays a scripted event
//! sequence without running any process.

pub mod error;
pub mod signal;
pub mod tokio_spawner;

use std::collections::BTreeMap;
use std::path::PathBuf;

use tokio::sync::mpsc;

use crate::types::{StdioMode, StreamKind};

pub use error::SpawnError;
pub use tokio_spawner::TokioSpawner;

/// Options handed through to the spawner untouched.
///
/// Everything the driver itself understands (logging, rendering hooks)
/// lives on [`InvokeOptions`](crate::invoke::InvokeOptions) instead and is
/// never passed down here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnOptions {
    /// Working directory for the child. Inherited when `None`.
    pub cwd: Option<PathBuf>,
    /// Extra environment variables, applied after `env_clear`.
    pub env: BTreeMap<String, String>,
    /// Start from an empty environment instead of inheriting ours.
    pub env_clear: bool,
    pub stdio: StdioMode,
}

/// Events a spawner reports for one process.
///
/// A well-behaved spawner sends any number of `Data`/`StreamError` events
/// followed by exactly one terminal event (`Close` or `Error`), after which
/// it drops its sender.
#[derive(Debug, Clone)]
pub enum ProcessEvent {
    /// Raw bytes read from stdout or stderr, in arrival order.
    Data { stream: StreamKind, chunk: Vec<u8> },
    /// Reading one of the output pipes failed.
    StreamError { stream: StreamKind, error: SpawnError },
    /// The process exited and both output pipes reached EOF.
    ///
    /// `code` is `None` when the process was killed by a signal.
    Close {
        code: Option<i32>,
        signal: Option<String>,
    },
    /// The process could not be started or could not be waited on.
    Error(SpawnError),
}

impl ProcessEvent {
    /// Whether this event ends the process lifecycle.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProcessEvent::Close { .. } | ProcessEvent::Error(_))
    }
}

/// The spawning primitive.
///
/// Implementations must be callable from within a Tokio runtime and must
/// not block: all waiting happens on the returned channel.
pub trait Spawner: Send + Sync {
    fn spawn(
        &self,
        cmd: &str,
        args: &[String],
        options: &SpawnOptions,
    ) -> mpsc::Receiver<ProcessEvent>;
}
