use std::sync::mpsc;

use sidebar_core::{ConnectionStatus, JobKind, RequestId, WatchdogToken};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Status(ConnectionStatus),
    /// Raw text frame; parsing belongs to the router.
    Frame(String),
    LaunchAccepted {
        job: JobKind,
        request_id: RequestId,
    },
    LaunchFailed {
        job: JobKind,
        request_id: RequestId,
        error: LaunchError,
    },
    FeedWatchdogElapsed {
        token: WatchdogToken,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LaunchError {
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid {field} {value:?}: {reason}")]
    InvalidSetting {
        field: &'static str,
        value: String,
        reason: String,
    },
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("failed to spawn engine thread: {0}")]
    Thread(#[source] std::io::Error),
    #[error("failed to build http client: {0}")]
    HttpClient(String),
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}
