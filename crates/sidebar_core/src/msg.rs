use crate::{AutoTradeOrder, ChannelKind, ConnectionStatus, JobKind, RequestId, WatchdogToken};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Raw text frame read from the socket.
    FrameReceived(String),
    /// Connection manager reported a socket status change.
    ConnectionChanged(ConnectionStatus),
    /// Host page revealed the event the user is looking at.
    EventContextDiscovered(String),
    /// User opened the live feed for a market.
    FeedRequested { market_title: String },
    /// User sent a chat turn.
    ChatSubmitted(String),
    /// User started deep research on a market.
    ResearchRequested {
        market_title: String,
        custom_notes: String,
    },
    /// User asked a follow-up question about the research report.
    FollowupSubmitted(String),
    /// User placed a conditional autotrade order.
    AutoTradeSubmitted(AutoTradeOrder),
    /// User cleared a channel.
    ChannelReset(ChannelKind),
    /// User dismissed the autotrade status.
    AutoTradeCleared,
    /// The backend accepted a triggering call.
    TriggerAccepted { job: JobKind, request_id: RequestId },
    /// A triggering call failed at the transport level.
    TriggerFailed {
        job: JobKind,
        request_id: RequestId,
        message: String,
    },
    /// Feed loading watchdog expired.
    FeedWatchdogElapsed { token: WatchdogToken },
    /// UI/render tick to coalesce rendering.
    Tick,
    NoOp,
}
