use std::time::Duration;

use anyhow::Result;
use sidebar_core::{ClientId, Effect, Msg};
use sidebar_engine::{EngineEvent, EngineHandle, EngineSettings};
use sidebar_logging::sidebar_debug;

/// Executes core effects on the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: EngineSettings, client_id: ClientId) -> Result<Self> {
        let engine = EngineHandle::new(settings, client_id)?;
        Ok(Self { engine })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            sidebar_debug!("effect {}", describe(&effect));
            self.engine.execute(effect);
        }
    }

    /// Waits up to `timeout` for the next engine event.
    pub fn next_msg(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).map(map_event)
    }

    pub fn shutdown(self) {
        self.engine.shutdown();
    }
}

pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Status(status) => Msg::ConnectionChanged(status),
        EngineEvent::Frame(raw) => Msg::FrameReceived(raw),
        EngineEvent::LaunchAccepted { job, request_id } => {
            Msg::TriggerAccepted { job, request_id }
        }
        EngineEvent::LaunchFailed {
            job,
            request_id,
            error,
        } => Msg::TriggerFailed {
            job,
            request_id,
            message: error.to_string(),
        },
        EngineEvent::FeedWatchdogElapsed { token } => Msg::FeedWatchdogElapsed { token },
    }
}

fn describe(effect: &Effect) -> String {
    match effect {
        Effect::SendControl(frame) => format!("send {frame:?}"),
        Effect::AnnounceEventContext(slug) => format!("event context {slug}"),
        Effect::Launch(request) => {
            format!("launch {} request {}", request.kind(), request.request_id())
        }
        Effect::ArmFeedWatchdog { token } => format!("feed watchdog {token}"),
    }
}
