// src/spawn/tokio_spawner.rs

//! Production spawner built on `tokio::process::Command`.

use std::process::Stdio;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::spawn::signal::exit_signal;
use crate::spawn::{ProcessEvent, SpawnError, SpawnOptions, Spawner};
use crate::types::{StdioMode, StreamKind};

/// Size of a single read from a child pipe. Chunks are forwarded as read,
/// so multi-byte characters may straddle two `Data` events.
const READ_CHUNK_SIZE: usize = 8 * 1024;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Spawns real OS processes.
///
/// Each call to [`Spawner::spawn`] starts one background Tokio task that
/// owns the child, plus one reader task per captured pipe.
#[derive(Debug, Clone, Default)]
pub struct TokioSpawner;

impl TokioSpawner {
    pub fn new() -> Self {
        Self
    }
}

impl Spawner for TokioSpawner {
    fn spawn(
        &self,
        cmd: &str,
        args: &[String],
        options: &SpawnOptions,
    ) -> mpsc::Receiver<ProcessEvent> {
        let (tx, rx) = mpsc::channel::<ProcessEvent>(EVENT_CHANNEL_CAPACITY);

        let cmd = cmd.to_string();
        let args = args.to_vec();
        let options = options.clone();
        tokio::spawn(async move {
            run_child(cmd, args, options, tx).await;
        });

        rx
    }
}

fn build_command(cmd: &str, args: &[String], options: &SpawnOptions) -> Command {
    let mut command = Command::new(cmd);
    command.args(args).kill_on_drop(true);

    if let Some(cwd) = &options.cwd {
        command.current_dir(cwd);
    }
    if options.env_clear {
        command.env_clear();
    }
    command.envs(&options.env);

    match options.stdio {
        StdioMode::Pipe => {
            command
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped());
        }
        StdioMode::Ignore => {
            command
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null());
        }
        StdioMode::Inherit => {
            command
                .stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit());
        }
    }

    command
}

/// Start the child, forward its output, and finish with exactly one
/// terminal event.
///
/// `Close` is only sent once the child has been reaped *and* both readers
/// have hit EOF, so every `Data` event precedes it on the channel.
async fn run_child(
    cmd: String,
    args: Vec<String>,
    options: SpawnOptions,
    tx: mpsc::Sender<ProcessEvent>,
) {
    let mut command = build_command(&cmd, &args, &options);

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(err) => {
            debug!(cmd = %cmd, error = %err, "failed to spawn process");
            let event = ProcessEvent::Error(SpawnError::from_spawn(&cmd, &args, err));
            if tx.send(event).await.is_err() {
                debug!(cmd = %cmd, "event receiver dropped before spawn error was delivered");
            }
            return;
        }
    };

    info!(
        cmd = %cmd,
        pid = ?child.id(),
        stdio = %options.stdio,
        captured = options.stdio.captures_output(),
        "process started"
    );

    let mut readers: Vec<JoinHandle<()>> = Vec::with_capacity(2);
    if let Some(stdout) = child.stdout.take() {
        readers.push(spawn_reader(StreamKind::Stdout, stdout, tx.clone()));
    }
    if let Some(stderr) = child.stderr.take() {
        readers.push(spawn_reader(StreamKind::Stderr, stderr, tx.clone()));
    }

    let status = child.wait().await;

    for reader in readers {
        if let Err(err) = reader.await {
            warn!(cmd = %cmd, error = %err, "stream reader task failed");
        }
    }

    let event = match status {
        Ok(status) => {
            let code = status.code();
            let signal = exit_signal(&status);
            info!(
                cmd = %cmd,
                exit_code = ?code,
                signal = ?signal,
                success = status.success(),
                "process exited"
            );
            ProcessEvent::Close { code, signal }
        }
        Err(err) => {
            warn!(cmd = %cmd, error = %err, "failed to wait for process");
            ProcessEvent::Error(SpawnError::from_wait(&cmd, err))
        }
    };

    if tx.send(event).await.is_err() {
        debug!(cmd = %cmd, "event receiver dropped before close was delivered");
    }
}

/// Forward raw chunks from one pipe until EOF or the receiver goes away.
fn spawn_reader<R>(
    stream: StreamKind,
    mut reader: R,
    tx: mpsc::Sender<ProcessEvent>,
) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = vec![0u8; READ_CHUNK_SIZE];
        loop {
            match reader.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => {
                    let event = ProcessEvent::Data {
                        stream,
                        chunk: buf[..n].to_vec(),
                    };
                    if tx.send(event).await.is_err() {
                        debug!(%stream, "event receiver dropped; stopping reader");
                        break;
                    }
                }
                Err(err) => {
                    warn!(%stream, error = %err, "error reading from child pipe");
                    let _ = tx
                        .send(ProcessEvent::StreamError {
                            stream,
                            error: SpawnError::from_stream(stream, err),
                        })
                        .await;
                    break;
                }
            }
        }
        debug!(%stream, "stream reader finished");
    })
}
