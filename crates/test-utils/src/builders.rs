#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use procrun::spawn::{ProcessEvent, SpawnError};
use procrun::StreamKind;

/// Builder for scripted `ProcessEvent` sequences.
#[derive(Debug, Clone, Default)]
pub struct EventScript {
    events: Vec<ProcessEvent>,
}

impl EventScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stdout(mut self, chunk: impl AsRef<[u8]>) -> Self {
        self.events.push(ProcessEvent::Data {
            stream: StreamKind::Stdout,
            chunk: chunk.as_ref().to_vec(),
        });
        self
    }

    pub fn stderr(mut self, chunk: impl AsRef<[u8]>) -> Self {
        self.events.push(ProcessEvent::Data {
            stream: StreamKind::Stderr,
            chunk: chunk.as_ref().to_vec(),
        });
        self
    }

    pub fn stream_error(mut self, stream: StreamKind, error: SpawnError) -> Self {
        self.events.push(ProcessEvent::StreamError { stream, error });
        self
    }

    pub fn exit(mut self, code: i32) -> Self {
        self.events.push(ProcessEvent::Close {
            code: Some(code),
            signal: None,
        });
        self
    }

    pub fn signal(mut self, signal: &str) -> Self {
        self.events.push(ProcessEvent::Close {
            code: None,
            signal: Some(signal.to_string()),
        });
        self
    }

    /// A close event carrying neither an exit code nor a signal.
    pub fn close_without_status(mut self) -> Self {
        self.events.push(ProcessEvent::Close {
            code: None,
            signal: None,
        });
        self
    }

    pub fn error(mut self, error: SpawnError) -> Self {
        self.events.push(ProcessEvent::Error(error));
        self
    }

    pub fn build(self) -> Vec<ProcessEvent> {
        self.events
    }
}

/// Logger hook that stores every message it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingLogger {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// A closure suitable for `InvokeOptions::logger`.
    pub fn hook(&self) -> impl Fn(&str) + Send + Sync + 'static {
        let messages = Arc::clone(&self.messages);
        move |message: &str| messages.lock().unwrap().push(message.to_string())
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}
