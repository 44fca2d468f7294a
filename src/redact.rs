// src/redact.rs

//! Regex-based redaction of secrets in output and command lines.
//!
//! A match of the form `key=value` keeps its key and loses its value, so
//! `authToken=abc123` becomes `authToken=REDACTED`. Matches without an `=`
//! are replaced wholesale.

use std::sync::Arc;

use regex::{Captures, Regex};

use crate::invoke::InvokeOptions;
use crate::render::stringify_command;

pub const DEFAULT_REPLACEMENT: &str = "REDACTED";

#[derive(Debug, Clone)]
pub struct Redactor {
    patterns: Vec<Regex>,
    replacement: String,
}

impl Default for Redactor {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
            replacement: DEFAULT_REPLACEMENT.to_string(),
        }
    }
}

impl Redactor {
    /// Compile `patterns`. Fails on the first invalid regex.
    pub fn new<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| Regex::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            patterns,
            ..Self::default()
        })
    }

    pub fn with_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.replacement = replacement.into();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn redact(&self, input: &str) -> String {
        let mut text = input.to_string();
        for pattern in &self.patterns {
            text = pattern
                .replace_all(&text, |caps: &Captures<'_>| {
                    let matched = &caps[0];
                    match matched.find('=') {
                        Some(idx) => format!("{}={}", &matched[..idx], self.replacement),
                        None => self.replacement.clone(),
                    }
                })
                .into_owned();
        }
        text
    }

    /// Install this redactor as both the output formatter and the command
    /// stringifier of `options`.
    ///
    /// The formatter redacts whichever stream `return_stderr` selects, so it
    /// must be installed after `return_stderr` is set.
    pub fn install(self, options: InvokeOptions) -> InvokeOptions {
        if self.is_empty() {
            return options;
        }

        let redactor = Arc::new(self);
        let return_stderr = options.return_stderr;

        let for_output = Arc::clone(&redactor);
        let for_command = redactor;

        options
            .format_output(move |stdout, stderr| {
                let chosen = if return_stderr { stderr } else { stdout };
                for_output.redact(chosen)
            })
            .stringify_command(move |cmd, args| {
                let args: Vec<String> = args.iter().map(|a| for_command.redact(a)).collect();
                stringify_command(cmd, &args)
            })
    }
}
