// src/render/mod.rs

//! Turning a settled invocation into the caller's result.
//!
//! - On a clean zero exit the success value is chosen by the
//!   `format_output` hook, or `return_stderr`, or defaults to stdout.
//! - Every other termination becomes one of the [`InvokeError`] variants,
//!   with a message built around the rendered command.

pub mod errors;

use crate::invoke::{CapturedOutput, InvokeOptions, Termination};

pub use errors::{ExitCodeError, ExitSignalError, InvokeError, LaunchError};

/// Default rendering of a command line: the command followed by its
/// arguments, separated by single spaces.
pub fn stringify_command(cmd: &str, args: &[String]) -> String {
    if args.is_empty() {
        cmd.to_string()
    } else {
        format!("{} {}", cmd, args.join(" "))
    }
}

/// Render the command with the caller's hook if one is configured.
pub fn render_command(options: &InvokeOptions, cmd: &str, args: &[String]) -> String {
    match &options.stringify_command {
        Some(hook) => hook(cmd, args),
        None => stringify_command(cmd, args),
    }
}

/// Pick the success value for a zero exit.
pub fn render_success(options: &InvokeOptions, output: CapturedOutput) -> String {
    if let Some(hook) = &options.format_output {
        return hook(&output.stdout, &output.stderr);
    }
    if options.return_stderr {
        output.stderr
    } else {
        output.stdout
    }
}

/// Map a termination plus captured output to the call's result.
pub fn render_outcome(
    options: &InvokeOptions,
    cmd: &str,
    args: &[String],
    termination: Termination,
    output: CapturedOutput,
) -> Result<String, InvokeError> {
    if let Termination::CleanExit { code: 0 } = termination {
        return Ok(render_success(options, output));
    }

    let CapturedOutput { stdout, stderr } = output;
    let full_command = render_command(options, cmd, args);

    let error = match termination {
        Termination::CleanExit { code } => InvokeError::ExitCode(ExitCodeError {
            message: format!(
                "Command failed with a non-zero return code ({code}):\n{full_command}\n{stdout}\n{stderr}"
            )
            .trim()
            .to_string(),
            cmd: cmd.to_string(),
            args: args.to_vec(),
            code,
            stdout,
            stderr,
        }),
        Termination::SignalExit { signal } => InvokeError::ExitSignal(ExitSignalError {
            message: format!(
                "Command terminated via a signal ({signal}):\n{full_command}\n{stdout}\n{stderr}"
            )
            .trim()
            .to_string(),
            cmd: cmd.to_string(),
            args: args.to_vec(),
            signal,
            stdout,
            stderr,
        }),
        Termination::LaunchFailure { error, fault } => InvokeError::Launch(LaunchError {
            message: format!(
                "Error executing command ({full_command}):\n{}\n{stderr}",
                error.describe()
            )
            .trim()
            .to_string(),
            cmd: cmd.to_string(),
            args: args.to_vec(),
            original_error: error,
            fault,
            stdout,
            stderr,
        }),
    };

    Err(error)
}
