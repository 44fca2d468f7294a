// src/spawn/error.rs

//! The underlying error a spawner reports when a process cannot be started,
//! waited on, or read from.
//!
//! Fields are public so an `update_error` hook can rewrite them in place
//! before the error is wrapped in a [`LaunchError`](crate::render::LaunchError).

use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::sync::Arc;

use crate::types::StreamKind;

#[derive(Debug, Clone)]
pub struct SpawnError {
    /// Human-readable message. `None` (or empty) after a hook removed it.
    pub message: Option<String>,
    /// Symbolic errno such as `"ENOENT"`, when one is known.
    pub code: Option<String>,
    /// Raw OS error number, when one is known.
    pub errno: Option<i32>,
    /// The failing operation, e.g. `"spawn does-not-exist"`.
    pub syscall: String,
    /// The executable the spawner tried to run.
    pub path: Option<String>,
    /// Full argv as attempted, command first.
    pub spawnargs: Vec<String>,
    source: Option<Arc<io::Error>>,
}

impl SpawnError {
    /// Create a bare error with no errno information.
    pub fn new(syscall: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            code: None,
            errno: None,
            syscall: syscall.into(),
            path: None,
            spawnargs: Vec::new(),
            source: None,
        }
    }

    /// Build the error for a process that could not be created.
    pub fn from_spawn(cmd: &str, args: &[String], err: io::Error) -> Self {
        let syscall = format!("spawn {cmd}");
        let mut spawnargs = Vec::with_capacity(args.len() + 1);
        spawnargs.push(cmd.to_string());
        spawnargs.extend(args.iter().cloned());

        let mut error = Self::from_io(syscall, err);
        error.path = Some(cmd.to_string());
        error.spawnargs = spawnargs;
        error
    }

    /// Build the error for a stdout/stderr pipe that failed mid-read.
    pub fn from_stream(stream: StreamKind, err: io::Error) -> Self {
        Self::from_io(format!("read {stream}"), err)
    }

    /// Build the error for a child that was started but could not be reaped.
    pub fn from_wait(cmd: &str, err: io::Error) -> Self {
        let mut error = Self::from_io(format!("wait {cmd}"), err);
        error.path = Some(cmd.to_string());
        error
    }

    fn from_io(syscall: String, err: io::Error) -> Self {
        let errno = err.raw_os_error();
        let code = errno_code(&err).map(str::to_string);
        let message = match &code {
            Some(code) => format!("{syscall} {code}"),
            None => format!("{syscall}: {err}"),
        };

        Self {
            message: Some(message),
            code,
            errno,
            syscall,
            path: None,
            spawnargs: Vec::new(),
            source: Some(Arc::new(err)),
        }
    }

    /// Builder-style override of the symbolic code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// The message, unless it was removed or emptied.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }

    /// The text used when this error is rendered into a [`LaunchError`]
    /// message: the message if present, otherwise the `Display` form.
    ///
    /// [`LaunchError`]: crate::render::LaunchError
    pub fn describe(&self) -> String {
        match self.message() {
            Some(m) => m.to_string(),
            None => self.to_string(),
        }
    }

    /// The I/O error this was built from, if any.
    pub fn io_error(&self) -> Option<&io::Error> {
        self.source.as_deref()
    }
}

/// Independent of `message`, so it stays meaningful after a hook clears it.
impl fmt::Display for SpawnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "Error: {} {}", self.syscall, code),
            None => write!(f, "Error: {}", self.syscall),
        }
    }
}

impl StdError for SpawnError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

fn errno_code(err: &io::Error) -> Option<&'static str> {
    #[cfg(unix)]
    {
        if let Some(name) = err.raw_os_error().and_then(errno_name) {
            return Some(name);
        }
    }

    match err.kind() {
        io::ErrorKind::NotFound => Some("ENOENT"),
        io::ErrorKind::PermissionDenied => Some("EACCES"),
        io::ErrorKind::BrokenPipe => Some("EPIPE"),
        io::ErrorKind::InvalidInput => Some("EINVAL"),
        io::ErrorKind::OutOfMemory => Some("ENOMEM"),
        _ => None,
    }
}

#[cfg(unix)]
fn errno_name(errno: i32) -> Option<&'static str> {
    let name = match errno {
        libc::ENOENT => "ENOENT",
        libc::EACCES => "EACCES",
        libc::EPERM => "EPERM",
        libc::ENOEXEC => "ENOEXEC",
        libc::ENOTDIR => "ENOTDIR",
        libc::EISDIR => "EISDIR",
        libc::E2BIG => "E2BIG",
        libc::ENOMEM => "ENOMEM",
        libc::EMFILE => "EMFILE",
        libc::ENFILE => "ENFILE",
        libc::EAGAIN => "EAGAIN",
        libc::ETXTBSY => "ETXTBSY",
        libc::ELOOP => "ELOOP",
        libc::ENAMETOOLONG => "ENAMETOOLONG",
        libc::EPIPE => "EPIPE",
        libc::EIO => "EIO",
        libc::EINVAL => "EINVAL",
        libc::EBADF => "EBADF",
        _ => return None,
    };
    Some(name)
}
