use sidebar_logging::{sidebar_debug, sidebar_warn};

use super::{is_current, Phase};
use crate::{ChannelKind, ChatMessage, Envelope, RequestId, Role, StreamAccumulator};

/// Transcript-style channel used by both chat and research follow-up.
///
/// Streamed deltas are mirrored into the trailing assistant entry, so the
/// transcript stays the source of truth once the accumulator is reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationChannel {
    kind: ChannelKind,
    phase: Phase,
    transcript: Vec<ChatMessage>,
    accumulator: StreamAccumulator,
    request: RequestId,
}

impl ConversationChannel {
    pub fn new(kind: ChannelKind) -> Self {
        Self {
            kind,
            phase: Phase::Idle,
            transcript: Vec::new(),
            accumulator: StreamAccumulator::new(),
            request: 0,
        }
    }

    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn live_text(&self) -> &str {
        self.accumulator.as_str()
    }

    pub fn request_id(&self) -> RequestId {
        self.request
    }

    /// Appends the user turn and starts a new request generation.
    ///
    /// Any in-flight reply is abandoned locally; the server is not told.
    pub fn begin_request(&mut self, user_text: impl Into<String>) -> RequestId {
        if self.phase.is_in_flight() {
            sidebar_debug!(
                "{}: abandoning request {} for a new one",
                self.kind,
                self.request
            );
        }
        self.request += 1;
        self.accumulator.reset();
        self.transcript.push(ChatMessage::user(user_text));
        self.phase = Phase::Thinking;
        self.request
    }

    /// Applies one routed frame. Returns whether visible state changed.
    pub fn handle(&mut self, envelope: &Envelope) -> bool {
        if !is_current(self.kind, self.request, envelope) {
            return false;
        }
        match envelope.sub_type() {
            "delta" => {
                self.phase = Phase::Streaming;
                self.accumulator
                    .append(envelope.content.as_deref().unwrap_or_default());
                self.mirror_accumulator();
                true
            }
            "complete" => {
                self.phase = Phase::Idle;
                self.accumulator.reset();
                true
            }
            "error" => {
                let text = envelope.error_text();
                sidebar_warn!("{}: server reported error: {}", self.kind, text);
                self.fail(text);
                true
            }
            other => {
                sidebar_debug!("{}: ignoring frame type {:?}", self.kind, other);
                false
            }
        }
    }

    /// The triggering call for `request` never reached the backend.
    pub fn fail_request(&mut self, request: RequestId, message: &str) -> bool {
        if request != self.request {
            return false;
        }
        self.fail(format!("Error: {message}"));
        true
    }

    /// Back to a fresh `Idle` channel. Late frames of the old request are dropped.
    pub fn reset(&mut self) {
        self.request += 1;
        self.phase = Phase::Idle;
        self.transcript.clear();
        self.accumulator.reset();
    }

    fn fail(&mut self, text: String) {
        self.phase = Phase::Error;
        self.accumulator.reset();
        self.transcript.push(ChatMessage::assistant(text));
    }

    fn mirror_accumulator(&mut self) {
        let live = self.accumulator.as_str();
        match self.transcript.last_mut() {
            Some(last) if last.role == Role::Assistant => {
                last.content.clear();
                last.content.push_str(live);
            }
            _ => self.transcript.push(ChatMessage::assistant(live)),
        }
    }
}
