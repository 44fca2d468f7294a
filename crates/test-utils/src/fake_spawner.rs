use std::sync::{Arc, Mutex};

use procrun::spawn::{ProcessEvent, SpawnOptions, Spawner};
use tokio::sync::mpsc;
use tracing::debug;

/// What the driver asked the spawner for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnRequest {
    pub cmd: String,
    pub args: Vec<String>,
    pub options: SpawnOptions,
}

/// A fake spawner that:
/// - records every spawn request
/// - replays a fixed list of events for each request, then closes the
///   channel.
///
/// No process is started, so tests can script orderings a real OS would
/// rarely produce (double terminal events, a close with neither code nor
/// signal, stream faults).
#[derive(Debug, Clone)]
pub struct FakeSpawner {
    script: Vec<ProcessEvent>,
    requests: Arc<Mutex<Vec<SpawnRequest>>>,
}

impl FakeSpawner {
    pub fn new(script: Vec<ProcessEvent>) -> Self {
        Self {
            script,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Snapshot of the requests seen so far.
    pub fn requests(&self) -> Vec<SpawnRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Spawner for FakeSpawner {
    fn spawn(
        &self,
        cmd: &str,
        args: &[String],
        options: &SpawnOptions,
    ) -> mpsc::Receiver<ProcessEvent> {
        self.requests.lock().unwrap().push(SpawnRequest {
            cmd: cmd.to_string(),
            args: args.to_vec(),
            options: options.clone(),
        });

        // Capacity covers the whole script, so `try_send` never blocks and
        // no runtime task is needed.
        let (tx, rx) = mpsc::channel(self.script.len().max(1));
        for event in self.script.iter().cloned() {
            if tx.try_send(event).is_err() {
                debug!(cmd, "fake spawner receiver dropped early");
                break;
            }
        }

        rx
    }
}
