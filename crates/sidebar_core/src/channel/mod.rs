mod conversation;
mod feed;
mod research;

pub use conversation::ConversationChannel;
pub use feed::{FeedChannel, WatchdogToken};
pub use research::{Recommendation, ResearchChannel};

use sidebar_logging::sidebar_debug;

use crate::{ChannelKind, Envelope, RequestId};

/// Lifecycle shared by the request-scoped channels.
///
/// `Error` is reachable from every state but `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Thinking,
    Streaming,
    Complete,
    Error,
}

impl Phase {
    pub fn is_in_flight(self) -> bool {
        matches!(self, Phase::Thinking | Phase::Streaming)
    }
}

/// Frames echoing an older request id belong to an abandoned request.
/// Frames without one are accepted.
pub(crate) fn is_current(kind: ChannelKind, current: RequestId, envelope: &Envelope) -> bool {
    match envelope.request_id {
        Some(id) if id != current => {
            sidebar_debug!(
                "{kind}: dropping {} frame for request {id}, current is {current}",
                envelope.sub_type()
            );
            false
        }
        _ => true,
    }
}
