// src/invoke/mod.rs

//! Running one process to completion.
//!
//! - [`InvokeOptions`] carries the pass-through [`SpawnOptions`] plus the
//!   caller's hooks (logger, error mutation, output formatting, command
//!   stringification).
//! - [`core`] is the pure state machine that turns process events into one
//!   [`Termination`] and the captured output.
//! - [`driver`] is the async shell: it logs, asks the spawner for a process,
//!   feeds the events into the core and hands the result to
//!   [`render`](crate::render).
//! - [`decoder`] holds the chunk-boundary-safe UTF-8 decoder.

pub mod core;
pub mod decoder;
pub mod driver;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::render::InvokeError;
use crate::spawn::{SpawnError, SpawnOptions, Spawner, TokioSpawner};
use crate::types::StdioMode;

pub use self::core::{CapturedOutput, FaultKind, InvocationPhase, InvocationState, Termination};
pub use self::decoder::Utf8StreamDecoder;

/// Receives `"Executing command <rendered command>"` once per call, before
/// the process is created.
pub type Logger = Arc<dyn Fn(&str) + Send + Sync>;

/// May rewrite a launch error in place. The flag tells whether a logger is
/// configured.
pub type UpdateErrorCallback = Arc<dyn Fn(&mut SpawnError, bool) + Send + Sync>;

/// Builds the success value from `(stdout, stderr)`.
pub type FormatOutputCallback = Arc<dyn Fn(&str, &str) -> String + Send + Sync>;

/// Renders `(cmd, args)` for the logger and for every error message.
pub type StringifyCommandCallback = Arc<dyn Fn(&str, &[String]) -> String + Send + Sync>;

/// Empty argument list, for commands run without arguments.
pub const NO_ARGS: [&str; 0] = [];

/// Per-call configuration. Every field is optional.
#[derive(Clone, Default)]
pub struct InvokeOptions {
    pub process: SpawnOptions,
    pub logger: Option<Logger>,
    pub update_error: Option<UpdateErrorCallback>,
    /// Resolve to stderr instead of stdout on success.
    pub return_stderr: bool,
    /// Overrides both the stdout default and `return_stderr`.
    pub format_output: Option<FormatOutputCallback>,
    pub stringify_command: Option<StringifyCommandCallback>,
}

impl fmt::Debug for InvokeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvokeOptions")
            .field("process", &self.process)
            .field("logger", &self.logger.is_some())
            .field("update_error", &self.update_error.is_some())
            .field("return_stderr", &self.return_stderr)
            .field("format_output", &self.format_output.is_some())
            .field("stringify_command", &self.stringify_command.is_some())
            .finish()
    }
}

impl InvokeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logger<F>(mut self, logger: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.logger = Some(Arc::new(logger));
        self
    }

    pub fn update_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut SpawnError, bool) + Send + Sync + 'static,
    {
        self.update_error = Some(Arc::new(callback));
        self
    }

    pub fn return_stderr(mut self, value: bool) -> Self {
        self.return_stderr = value;
        self
    }

    pub fn format_output<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str, &str) -> String + Send + Sync + 'static,
    {
        self.format_output = Some(Arc::new(callback));
        self
    }

    pub fn stringify_command<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str, &[String]) -> String + Send + Sync + 'static,
    {
        self.stringify_command = Some(Arc::new(callback));
        self
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.process.cwd = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.process.env.insert(key.into(), value.into());
        self
    }

    pub fn env_clear(mut self, value: bool) -> Self {
        self.process.env_clear = value;
        self
    }

    pub fn stdio(mut self, mode: StdioMode) -> Self {
        self.process.stdio = mode;
        self
    }

    pub fn has_logger(&self) -> bool {
        self.logger.is_some()
    }
}

/// A ready-made `logger` hook that emits the command line through
/// `tracing` at info level.
pub fn tracing_logger() -> impl Fn(&str) + Send + Sync + 'static {
    |message: &str| info!(target: "procrun::command", "{message}")
}

/// Run `cmd` with `args` as a real OS process and resolve to its output.
///
/// Resolves to stdout (or whatever the options select) when the process
/// exits with status zero; every other outcome is an [`InvokeError`].
pub async fn spawn<I, S>(cmd: &str, args: I, options: &InvokeOptions) -> Result<String, InvokeError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    spawn_with(&TokioSpawner::new(), cmd, args, options).await
}

/// Like [`spawn`], with an explicit spawning primitive.
pub async fn spawn_with<I, S>(
    spawner: &dyn Spawner,
    cmd: &str,
    args: I,
    options: &InvokeOptions,
) -> Result<String, InvokeError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();
    driver::run_invocation(spawner, cmd, &args, options).await
}
