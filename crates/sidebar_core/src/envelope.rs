use std::fmt;

use serde::{Deserialize, Serialize};

/// Correlation token for one request on a request-scoped channel.
/// `0` means no request has been started yet.
pub type RequestId = u64;

/// The four logical channels multiplexed over the one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Feed,
    Chat,
    Research,
    ResearchFollowup,
}

impl ChannelKind {
    pub const ALL: [ChannelKind; 4] = [
        ChannelKind::Feed,
        ChannelKind::Chat,
        ChannelKind::Research,
        ChannelKind::ResearchFollowup,
    ];

    /// Maps a wire `message_type` to its channel.
    pub fn from_discriminator(value: &str) -> Option<Self> {
        match value {
            "feed" => Some(ChannelKind::Feed),
            "chat" => Some(ChannelKind::Chat),
            "research" => Some(ChannelKind::Research),
            "research_followup" => Some(ChannelKind::ResearchFollowup),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChannelKind::Feed => "feed",
            ChannelKind::Chat => "chat",
            ChannelKind::Research => "research",
            ChannelKind::ResearchFollowup => "research_followup",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One server-to-client frame. Immutable once parsed.
///
/// Payload fields are all optional; which ones matter depends on
/// `message_type` and the per-channel sub-type carried in `type`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Envelope {
    pub message_type: Option<String>,
    #[serde(rename = "type")]
    pub sub_type: Option<String>,
    pub content: Option<String>,
    pub item: Option<FeedItem>,
    pub items: Option<Vec<FeedItem>>,
    pub error: Option<String>,
    pub recommendation: Option<String>,
    pub citations: Option<Vec<String>>,
    pub request_id: Option<RequestId>,
}

impl Envelope {
    pub fn sub_type(&self) -> &str {
        self.sub_type.as_deref().unwrap_or("")
    }

    /// Error text of an `error` frame, falling back to `content`.
    pub fn error_text(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.content.clone())
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}

/// A sentiment signal shown in the live feed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeedItem {
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    /// Attribution within the source: `@user`, `r/sub`, an outlet name.
    #[serde(default)]
    pub meta: Option<String>,
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

impl FeedItem {
    pub fn key(&self) -> ItemKey {
        ItemKey {
            link: self.link.clone().unwrap_or_default(),
            content: self.content.clone().unwrap_or_default(),
        }
    }
}

/// Content-addressed identity of a feed item.
///
/// Two items with equal `link` and `content` are the same signal, whatever
/// their sentiment or source say. Absent fields compare as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemKey {
    pub link: String,
    pub content: String,
}
