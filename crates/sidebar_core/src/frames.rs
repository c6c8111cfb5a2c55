//! Client-to-server payloads: socket control frames and triggering-call bodies.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ChannelKind, RequestId};

/// Opaque per-session identity. Generated once, never interpreted locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Frames written on the socket itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ControlFrame {
    Typed(TypedControl),
    /// `{"event_slug": ...}`; carries no `type` field on the wire.
    EventContext { event_slug: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TypedControl {
    Register {
        client_id: ClientId,
    },
    FeedRequest {
        market_title: String,
        client_id: ClientId,
    },
}

impl ControlFrame {
    pub fn register(client_id: ClientId) -> Self {
        ControlFrame::Typed(TypedControl::Register { client_id })
    }

    pub fn feed_request(market_title: impl Into<String>, client_id: ClientId) -> Self {
        ControlFrame::Typed(TypedControl::FeedRequest {
            market_title: market_title.into(),
            client_id,
        })
    }

    pub fn event_context(event_slug: impl Into<String>) -> Self {
        ControlFrame::EventContext {
            event_slug: event_slug.into(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub client_id: ClientId,
    pub request_id: RequestId,
    pub messages: Vec<ChatMessage>,
    pub event_slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResearchRequest {
    pub client_id: ClientId,
    pub request_id: RequestId,
    pub market_title: String,
    pub event_slug: Option<String>,
    pub custom_notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FollowupRequest {
    pub client_id: ClientId,
    pub request_id: RequestId,
    pub messages: Vec<ChatMessage>,
}

/// Conditional order: watch `x_handles` and buy `amount` of the market at
/// `limit` or better once `condition` holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutoTradeRequest {
    pub client_id: ClientId,
    pub request_id: RequestId,
    pub market_slug: String,
    pub x_handles: Vec<String>,
    pub condition: String,
    pub amount: f64,
    pub limit: f64,
}

/// Kinds of backend job a triggering call can start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    Chat,
    Research,
    Followup,
    AutoTrade,
}

impl JobKind {
    pub fn as_str(self) -> &'static str {
        match self {
            JobKind::Chat => "chat",
            JobKind::Research => "research",
            JobKind::Followup => "research_followup",
            JobKind::AutoTrade => "autotrade",
        }
    }

    /// Socket channel the job's output streams on. Autotrade has none.
    pub fn channel(self) -> Option<ChannelKind> {
        match self {
            JobKind::Chat => Some(ChannelKind::Chat),
            JobKind::Research => Some(ChannelKind::Research),
            JobKind::Followup => Some(ChannelKind::ResearchFollowup),
            JobKind::AutoTrade => None,
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A triggering call. Its response only says whether the job was accepted;
/// results, if any, arrive later as socket frames.
#[derive(Debug, Clone, PartialEq)]
pub enum JobRequest {
    Chat(ChatRequest),
    Research(ResearchRequest),
    Followup(FollowupRequest),
    AutoTrade(AutoTradeRequest),
}

impl JobRequest {
    pub fn kind(&self) -> JobKind {
        match self {
            JobRequest::Chat(_) => JobKind::Chat,
            JobRequest::Research(_) => JobKind::Research,
            JobRequest::Followup(_) => JobKind::Followup,
            JobRequest::AutoTrade(_) => JobKind::AutoTrade,
        }
    }

    pub fn request_id(&self) -> RequestId {
        match self {
            JobRequest::Chat(req) => req.request_id,
            JobRequest::Research(req) => req.request_id,
            JobRequest::Followup(req) => req.request_id,
            JobRequest::AutoTrade(req) => req.request_id,
        }
    }

    pub fn client_id(&self) -> &ClientId {
        match self {
            JobRequest::Chat(req) => &req.client_id,
            JobRequest::Research(req) => &req.client_id,
            JobRequest::Followup(req) => &req.client_id,
            JobRequest::AutoTrade(req) => &req.client_id,
        }
    }
}
