use serde_json::error::Category;
use sidebar_logging::{sidebar_debug, sidebar_warn};

use crate::{ChannelKind, Envelope};

/// Result of parsing one inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Deliver to the channel's state machine.
    Deliver(ChannelKind, Envelope),
    /// Valid envelope for no known channel (acks, other control traffic).
    Unrouted { message_type: Option<String> },
    /// Not JSON, or JSON of the wrong shape.
    Malformed { reason: String },
}

/// Parses a raw frame once and resolves its destination channel.
///
/// Never panics on any input; malformed frames are logged here and must not
/// reach channel state.
pub fn route_frame(raw: &str) -> Route {
    let envelope: Envelope = match serde_json::from_str(raw) {
        Ok(envelope) => envelope,
        Err(err) => {
            let reason = match err.classify() {
                Category::Syntax | Category::Eof => format!("invalid json: {err}"),
                Category::Data => format!("unexpected envelope shape: {err}"),
                Category::Io => format!("read error: {err}"),
            };
            sidebar_warn!("router: discarding frame ({}): {}", reason, preview(raw));
            return Route::Malformed { reason };
        }
    };

    match envelope
        .message_type
        .as_deref()
        .and_then(ChannelKind::from_discriminator)
    {
        Some(kind) => Route::Deliver(kind, envelope),
        None => {
            sidebar_debug!(
                "router: no channel for message_type {:?}",
                envelope.message_type
            );
            Route::Unrouted {
                message_type: envelope.message_type,
            }
        }
    }
}

fn preview(raw: &str) -> &str {
    const MAX: usize = 120;
    if raw.len() <= MAX {
        return raw;
    }
    let mut end = MAX;
    while !raw.is_char_boundary(end) {
        end -= 1;
    }
    &raw[..end]
}
