use crate::channel::{Phase, Recommendation};
use crate::{AutoTradeOrder, AutoTradePhase, ChatMessage, ConnectionStatus, FeedItem};

/// Read-only snapshot handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SidebarViewModel {
    pub client_id: String,
    pub connection: ConnectionStatus,
    pub event_slug: Option<String>,
    pub feed: FeedView,
    pub chat: ConversationView,
    pub research: ResearchView,
    pub followup: ConversationView,
    pub autotrade: AutoTradeView,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AutoTradeView {
    pub phase: AutoTradePhase,
    pub order: Option<AutoTradeOrder>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedView {
    pub market_title: Option<String>,
    pub items: Vec<FeedItem>,
    pub loading: bool,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConversationView {
    pub phase: Phase,
    pub transcript: Vec<ChatMessage>,
    /// Accumulator contents of the in-flight reply.
    pub live_text: String,
    pub is_generating: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResearchView {
    pub phase: Phase,
    pub market_title: Option<String>,
    pub thinking_log: Vec<String>,
    pub live_text: String,
    pub report: String,
    pub recommendation: Option<Recommendation>,
    pub citations: Vec<String>,
    pub is_generating: bool,
}
