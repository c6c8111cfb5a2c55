use std::str::FromStr;

use sidebar_logging::{sidebar_debug, sidebar_warn};

use super::{is_current, Phase};
use crate::{ChannelKind, Envelope, RequestId, StreamAccumulator};

/// Final trade call attached to a `complete` research frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    Yes,
    No,
    Noop,
}

impl Recommendation {
    pub fn as_str(self) -> &'static str {
        match self {
            Recommendation::Yes => "YES",
            Recommendation::No => "NO",
            Recommendation::Noop => "NOOP",
        }
    }
}

impl FromStr for Recommendation {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "YES" => Ok(Recommendation::Yes),
            "NO" => Ok(Recommendation::No),
            "NOOP" => Ok(Recommendation::Noop),
            _ => Err(format!("unknown recommendation {value:?}")),
        }
    }
}

/// Deep-research report channel: a planning phase that emits progress lines,
/// then a streamed report, then a recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResearchChannel {
    phase: Phase,
    market_title: Option<String>,
    custom_notes: String,
    thinking_log: Vec<String>,
    accumulator: StreamAccumulator,
    report: String,
    recommendation: Option<Recommendation>,
    citations: Vec<String>,
    request: RequestId,
}

impl ResearchChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn market_title(&self) -> Option<&str> {
        self.market_title.as_deref()
    }

    pub fn custom_notes(&self) -> &str {
        &self.custom_notes
    }

    pub fn thinking_log(&self) -> &[String] {
        &self.thinking_log
    }

    pub fn live_text(&self) -> &str {
        self.accumulator.as_str()
    }

    pub fn report(&self) -> &str {
        &self.report
    }

    pub fn recommendation(&self) -> Option<Recommendation> {
        self.recommendation
    }

    pub fn citations(&self) -> &[String] {
        &self.citations
    }

    pub fn request_id(&self) -> RequestId {
        self.request
    }

    pub fn begin_request(&mut self, market_title: &str, custom_notes: &str) -> RequestId {
        if self.phase.is_in_flight() {
            sidebar_debug!("research: abandoning request {}", self.request);
        }
        let request = self.request + 1;
        *self = Self {
            phase: Phase::Thinking,
            market_title: Some(market_title.to_string()),
            custom_notes: custom_notes.to_string(),
            request,
            ..Self::default()
        };
        request
    }

    pub fn handle(&mut self, envelope: &Envelope) -> bool {
        if !is_current(ChannelKind::Research, self.request, envelope) {
            return false;
        }
        match envelope.sub_type() {
            "thinking" => {
                self.phase = Phase::Thinking;
                if let Some(line) = &envelope.content {
                    self.thinking_log.push(line.clone());
                }
                true
            }
            "delta" => {
                // The first delta ends the planning phase.
                if self.phase != Phase::Streaming {
                    self.thinking_log.clear();
                }
                self.phase = Phase::Streaming;
                self.accumulator
                    .append(envelope.content.as_deref().unwrap_or_default());
                self.report.clear();
                self.report.push_str(self.accumulator.as_str());
                true
            }
            "complete" => {
                self.phase = Phase::Complete;
                self.accumulator.reset();
                self.recommendation = envelope.recommendation.as_deref().and_then(|tag| {
                    tag.parse()
                        .map_err(|err| sidebar_warn!("research: {}", err))
                        .ok()
                });
                if let Some(citations) = &envelope.citations {
                    self.citations = citations.clone();
                }
                true
            }
            "error" => {
                let text = envelope.error_text();
                sidebar_warn!("research: server reported error: {}", text);
                self.fail(text);
                true
            }
            other => {
                sidebar_debug!("research: ignoring frame type {:?}", other);
                false
            }
        }
    }

    pub fn fail_request(&mut self, request: RequestId, message: &str) -> bool {
        if request != self.request {
            return false;
        }
        self.fail(format!("Failed to start research: {message}"));
        true
    }

    pub fn reset(&mut self) {
        let request = self.request + 1;
        *self = Self {
            request,
            ..Self::default()
        };
    }

    fn fail(&mut self, text: String) {
        self.phase = Phase::Error;
        self.accumulator.reset();
        self.report = text;
    }
}
