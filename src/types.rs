// src/types.rs

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::Deserialize;

/// How the child's standard streams are wired.
///
/// - `Pipe`: stdout and stderr are captured; stdin is closed (default).
/// - `Ignore`: all three streams go to the null device; nothing is captured.
/// - `Inherit`: the child shares the parent's streams; nothing is captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StdioMode {
    Pipe,
    Ignore,
    Inherit,
}

impl Default for StdioMode {
    fn default() -> Self {
        StdioMode::Pipe
    }
}

impl StdioMode {
    /// Whether stdout/stderr are handed back to the caller as streams.
    pub fn captures_output(self) -> bool {
        matches!(self, StdioMode::Pipe)
    }
}

impl FromStr for StdioMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pipe" => Ok(StdioMode::Pipe),
            "ignore" => Ok(StdioMode::Ignore),
            "inherit" => Ok(StdioMode::Inherit),
            other => Err(format!(
                "invalid stdio mode: {other} (expected \"pipe\", \"ignore\" or \"inherit\")"
            )),
        }
    }
}

impl fmt::Display for StdioMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StdioMode::Pipe => "pipe",
            StdioMode::Ignore => "ignore",
            StdioMode::Inherit => "inherit",
        };
        f.write_str(s)
    }
}

/// Which of the two captured output streams an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Stdout => f.write_str("stdout"),
            StreamKind::Stderr => f.write_str("stderr"),
        }
    }
}
