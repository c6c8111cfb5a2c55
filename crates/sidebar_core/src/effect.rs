use crate::{ControlFrame, JobRequest, WatchdogToken};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Write a control frame on the socket if it is open.
    SendControl(ControlFrame),
    /// Store the event context and send it now and after every reconnect.
    AnnounceEventContext(String),
    /// Fire a triggering call; results arrive later on the socket.
    Launch(JobRequest),
    /// Deliver `Msg::FeedWatchdogElapsed { token }` after the watchdog window.
    ArmFeedWatchdog { token: WatchdogToken },
}
