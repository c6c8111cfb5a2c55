use crate::channel::{ConversationChannel, FeedChannel, ResearchChannel};
use crate::view_model::{
    AutoTradeView, ConversationView, FeedView, ResearchView, SidebarViewModel,
};
use crate::{AutoTradeTracker, ChannelKind, ClientId, Envelope};

/// Socket status as reported by the connection manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    Connected,
    Error,
    Disconnected,
}

/// Everything the sidebar shows for one browser session.
#[derive(Debug, Clone, PartialEq)]
pub struct SidebarState {
    client_id: ClientId,
    connection: ConnectionStatus,
    event_slug: Option<String>,
    feed: FeedChannel,
    chat: ConversationChannel,
    research: ResearchChannel,
    followup: ConversationChannel,
    autotrade: AutoTradeTracker,
    dirty: bool,
}

impl Default for SidebarState {
    fn default() -> Self {
        Self::new(ClientId::default())
    }
}

impl SidebarState {
    pub fn new(client_id: ClientId) -> Self {
        Self {
            client_id,
            connection: ConnectionStatus::default(),
            event_slug: None,
            feed: FeedChannel::new(),
            chat: ConversationChannel::new(ChannelKind::Chat),
            research: ResearchChannel::new(),
            followup: ConversationChannel::new(ChannelKind::ResearchFollowup),
            autotrade: AutoTradeTracker::new(),
            dirty: false,
        }
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn connection(&self) -> ConnectionStatus {
        self.connection
    }

    pub fn event_slug(&self) -> Option<&str> {
        self.event_slug.as_deref()
    }

    pub fn feed(&self) -> &FeedChannel {
        &self.feed
    }

    pub fn chat(&self) -> &ConversationChannel {
        &self.chat
    }

    pub fn research(&self) -> &ResearchChannel {
        &self.research
    }

    pub fn followup(&self) -> &ConversationChannel {
        &self.followup
    }

    pub fn autotrade(&self) -> &AutoTradeTracker {
        &self.autotrade
    }

    pub fn view(&self) -> SidebarViewModel {
        SidebarViewModel {
            client_id: self.client_id.to_string(),
            connection: self.connection,
            event_slug: self.event_slug.clone(),
            feed: FeedView {
                market_title: self.feed.market_title().map(str::to_owned),
                items: self.feed.items().to_vec(),
                loading: self.feed.is_loading(),
                last_error: self.feed.last_error().map(str::to_owned),
            },
            chat: conversation_view(&self.chat),
            research: ResearchView {
                phase: self.research.phase(),
                market_title: self.research.market_title().map(str::to_owned),
                thinking_log: self.research.thinking_log().to_vec(),
                live_text: self.research.live_text().to_string(),
                report: self.research.report().to_string(),
                recommendation: self.research.recommendation(),
                citations: self.research.citations().to_vec(),
                is_generating: self.research.phase().is_in_flight(),
            },
            followup: conversation_view(&self.followup),
            autotrade: AutoTradeView {
                phase: self.autotrade.phase().clone(),
                order: self.autotrade.order().cloned(),
            },
            dirty: self.dirty,
        }
    }

    /// Returns whether anything visible changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty_if(&mut self, changed: bool) {
        self.dirty |= changed;
    }

    pub(crate) fn set_connection(&mut self, status: ConnectionStatus) {
        if self.connection != status {
            self.connection = status;
            self.dirty = true;
        }
    }

    pub(crate) fn set_event_slug(&mut self, slug: String) -> bool {
        if self.event_slug.as_deref() == Some(slug.as_str()) {
            return false;
        }
        self.event_slug = Some(slug);
        self.dirty = true;
        true
    }

    pub(crate) fn feed_mut(&mut self) -> &mut FeedChannel {
        &mut self.feed
    }

    pub(crate) fn chat_mut(&mut self) -> &mut ConversationChannel {
        &mut self.chat
    }

    pub(crate) fn research_mut(&mut self) -> &mut ResearchChannel {
        &mut self.research
    }

    pub(crate) fn followup_mut(&mut self) -> &mut ConversationChannel {
        &mut self.followup
    }

    pub(crate) fn autotrade_mut(&mut self) -> &mut AutoTradeTracker {
        &mut self.autotrade
    }

    /// Typed dispatch to exactly one channel.
    pub(crate) fn deliver(&mut self, kind: ChannelKind, envelope: &Envelope) {
        let changed = match kind {
            ChannelKind::Feed => self.feed.handle(envelope),
            ChannelKind::Chat => self.chat.handle(envelope),
            ChannelKind::Research => self.research.handle(envelope),
            ChannelKind::ResearchFollowup => self.followup.handle(envelope),
        };
        self.mark_dirty_if(changed);
    }
}

fn conversation_view(channel: &ConversationChannel) -> ConversationView {
    ConversationView {
        phase: channel.phase(),
        transcript: channel.transcript().to_vec(),
        live_text: channel.live_text().to_string(),
        is_generating: channel.phase().is_in_flight(),
    }
}
