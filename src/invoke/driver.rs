// src/invoke/driver.rs

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::invoke::core::{CapturedOutput, FaultKind, InvocationState, Termination};
use crate::invoke::InvokeOptions;
use crate::render::{render_command, render_outcome, InvokeError};
use crate::spawn::{ProcessEvent, Spawner};

/// Run one invocation end to end.
///
/// The logger fires before the spawner is asked for a process. Only
/// `options.process` is handed to the spawner.
pub async fn run_invocation(
    spawner: &dyn Spawner,
    cmd: &str,
    args: &[String],
    options: &InvokeOptions,
) -> Result<String, InvokeError> {
    let rendered = render_command(options, cmd, args);
    if let Some(logger) = &options.logger {
        logger(&format!("Executing command {rendered}"));
    }

    debug!(command = %rendered, process = ?options.process, "spawning process");
    let events = spawner.spawn(cmd, args, &options.process);

    let (mut termination, output) = collect_events(events).await;

    if let Termination::LaunchFailure {
        error,
        fault: FaultKind::Spawn,
    } = &mut termination
    {
        if let Some(update_error) = &options.update_error {
            update_error(error, options.has_logger());
        }
    }

    info!(
        command = %rendered,
        phase = ?termination.phase(),
        stdout_len = output.stdout.len(),
        stderr_len = output.stderr.len(),
        "invocation finished"
    );

    render_outcome(options, cmd, args, termination, output)
}

/// Drain events until the invocation settles.
///
/// Stops reading at the first termination; the receiver is closed so a
/// spawner still holding a sender sees its later sends fail.
pub async fn collect_events(
    mut events: mpsc::Receiver<ProcessEvent>,
) -> (Termination, CapturedOutput) {
    let mut state = InvocationState::new();

    let termination = loop {
        match events.recv().await {
            Some(event) => {
                if let Some(termination) = state.step(event) {
                    break termination;
                }
            }
            None => break state.end_of_events(),
        }
    };

    events.close();
    (termination, state.into_output())
}
