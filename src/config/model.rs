// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::invoke::InvokeOptions;
use crate::redact::Redactor;
use crate::spawn::SpawnOptions;
use crate::types::StdioMode;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [options]
/// return_stderr = false
/// stdio = "pipe"
/// cwd = "build"
///
/// [options.env]
/// RUST_LOG = "debug"
///
/// [redact]
/// patterns = ['authToken=\S*']
/// ```
///
/// Both sections are optional.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub options: OptionsSection,

    #[serde(default)]
    pub redact: RedactSection,
}

/// `[options]` section: defaults for every invocation.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct OptionsSection {
    /// Resolve to stderr instead of stdout.
    #[serde(default)]
    pub return_stderr: bool,

    /// `"pipe"` (default), `"ignore"` or `"inherit"`.
    #[serde(default)]
    pub stdio: StdioMode,

    /// Working directory for the child, relative to the caller's cwd.
    #[serde(default)]
    pub cwd: Option<PathBuf>,

    /// Start the child with an empty environment.
    #[serde(default)]
    pub env_clear: bool,

    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

/// `[redact]` section.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct RedactSection {
    /// Regexes whose matches are hidden in output and logged commands.
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Text substituted for a match. Defaults to `REDACTED`.
    #[serde(default)]
    pub replacement: Option<String>,
}

/// Validated configuration. Built via `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub options: OptionsSection,
    pub redact: RedactSection,
    redactor: Redactor,
}

impl ConfigFile {
    /// Assemble a config whose parts were already validated.
    pub(crate) fn new_unchecked(
        options: OptionsSection,
        redact: RedactSection,
        redactor: Redactor,
    ) -> Self {
        Self {
            options,
            redact,
            redactor,
        }
    }

    /// The compiled `[redact]` patterns.
    pub fn redactor(&self) -> &Redactor {
        &self.redactor
    }

    pub fn spawn_options(&self) -> SpawnOptions {
        SpawnOptions {
            cwd: self.options.cwd.clone(),
            env: self.options.env.clone(),
            env_clear: self.options.env_clear,
            stdio: self.options.stdio,
        }
    }

    /// Invocation options carrying this file's defaults, without any hooks.
    pub fn invoke_options(&self) -> InvokeOptions {
        InvokeOptions {
            process: self.spawn_options(),
            return_stderr: self.options.return_stderr,
            ..InvokeOptions::default()
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(
            OptionsSection::default(),
            RedactSection::default(),
            Redactor::default(),
        )
    }
}
