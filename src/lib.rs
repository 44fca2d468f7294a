// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod invoke;
pub mod logging;
pub mod redact;
pub mod render;
pub mod spawn;
pub mod types;

use std::io::Write;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{default_config_path, load_and_validate, load_or_default, ConfigFile};
use crate::redact::Redactor;

pub use crate::invoke::{spawn, spawn_with, tracing_logger, InvokeOptions, NO_ARGS};
pub use crate::render::{
    stringify_command, ExitCodeError, ExitSignalError, InvokeError, LaunchError,
};
pub use crate::spawn::{ProcessEvent, SpawnError, SpawnOptions, Spawner, TokioSpawner};
pub use crate::types::{StdioMode, StreamKind};

/// High-level entry point used by `main.rs`.
///
/// Loads the config, merges CLI flags over it, runs the command once and
/// prints the result. Returns the exit code the binary should use.
pub async fn run(args: CliArgs) -> Result<i32> {
    let cfg = match &args.config {
        Some(path) => load_and_validate(path)
            .with_context(|| format!("loading config file {:?}", path))?,
        None => load_or_default(default_config_path())
            .context("loading default config file")?,
    };

    let options = build_options(&args, &cfg)?;
    debug!(?options, "resolved invocation options");

    match spawn(&args.command, &args.args, &options).await {
        Ok(output) => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            stdout.flush()?;
            Ok(0)
        }
        Err(err) => {
            info!(cmd = %err.cmd(), "command failed");
            eprintln!("{err}");
            Ok(exit_code_for(&err))
        }
    }
}

/// Combine config defaults, CLI flags and hooks into invocation options.
///
/// CLI values win over the config file; `--redact` patterns are added to
/// the file's `[redact]` patterns.
pub fn build_options(args: &CliArgs, cfg: &ConfigFile) -> Result<InvokeOptions> {
    let mut options = cfg.invoke_options();

    if args.return_stderr {
        options.return_stderr = true;
    }
    if let Some(cwd) = &args.cwd {
        options.process.cwd = Some(cwd.clone());
    }
    if let Some(stdio) = args.stdio {
        options.process.stdio = stdio;
    }
    for (key, value) in &args.env {
        options.process.env.insert(key.clone(), value.clone());
    }

    if !args.quiet {
        options = options.logger(tracing_logger());
    }

    let mut patterns = cfg.redact.patterns.clone();
    patterns.extend(args.redact.iter().cloned());
    let mut redactor = Redactor::new(&patterns).context("compiling --redact pattern")?;
    if let Some(replacement) = &cfg.redact.replacement {
        redactor = redactor.with_replacement(replacement.clone());
    }

    Ok(redactor.install(options))
}

/// The child's own status for non-zero exits, `1` for anything else.
pub fn exit_code_for(err: &InvokeError) -> i32 {
    err.exit_code().unwrap_or(1)
}
