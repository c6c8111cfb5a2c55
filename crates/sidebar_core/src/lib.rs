//! Sidebar core: wire model, channel state machines and the pure update loop.
mod accumulator;
mod autotrade;
pub mod channel;
mod effect;
mod envelope;
mod frames;
mod msg;
mod router;
mod state;
mod update;
mod view_model;

pub use accumulator::StreamAccumulator;
pub use autotrade::{AutoTradeOrder, AutoTradePhase, AutoTradeTracker};
pub use channel::{
    ConversationChannel, FeedChannel, Phase, Recommendation, ResearchChannel, WatchdogToken,
};
pub use effect::Effect;
pub use envelope::{ChannelKind, Envelope, FeedItem, ItemKey, RequestId};
pub use frames::{
    AutoTradeRequest, ChatMessage, ChatRequest, ClientId, ControlFrame, FollowupRequest, JobKind,
    JobRequest, ResearchRequest, Role, TypedControl,
};
pub use msg::Msg;
pub use router::{route_frame, Route};
pub use state::{ConnectionStatus, SidebarState};
pub use update::update;
pub use view_model::{AutoTradeView, ConversationView, FeedView, ResearchView, SidebarViewModel};
