use std::collections::HashSet;

use sidebar_logging::{sidebar_debug, sidebar_warn};

use crate::{Envelope, FeedItem, ItemKey};

/// Identifies one armed loading watchdog; stale expiries are ignored.
pub type WatchdogToken = u64;

/// Live sentiment feed. Not request-scoped: items keep arriving whenever the
/// backend produces them, and `loading` is only a coarse spinner flag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedChannel {
    market_title: Option<String>,
    items: Vec<FeedItem>,
    keys: HashSet<ItemKey>,
    loading: bool,
    last_error: Option<String>,
    watchdog: WatchdogToken,
}

impl FeedChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[FeedItem] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn market_title(&self) -> Option<&str> {
        self.market_title.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Marks the feed as loading for `market_title` and returns the token of
    /// the watchdog that must clear it if no terminal frame arrives.
    pub fn begin_request(&mut self, market_title: &str) -> WatchdogToken {
        if self.market_title.as_deref() != Some(market_title) {
            self.items.clear();
            self.keys.clear();
            self.market_title = Some(market_title.to_string());
        }
        self.loading = true;
        self.last_error = None;
        self.watchdog += 1;
        self.watchdog
    }

    pub fn handle(&mut self, envelope: &Envelope) -> bool {
        match envelope.sub_type() {
            "sentiment_items" => {
                self.items.clear();
                self.keys.clear();
                for item in envelope.items.iter().flatten() {
                    self.insert(item.clone());
                }
                self.loading = false;
                true
            }
            "sentiment_item" => {
                if let Some(item) = &envelope.item {
                    self.insert(item.clone());
                }
                self.loading = false;
                true
            }
            "error" => {
                let text = envelope.error_text();
                sidebar_warn!("feed: server reported error: {}", text);
                self.last_error = Some(text);
                self.loading = false;
                true
            }
            other => {
                sidebar_debug!("feed: ignoring frame type {:?}", other);
                false
            }
        }
    }

    /// Appends `item` unless an item with the same (link, content) is present.
    pub fn insert(&mut self, item: FeedItem) -> bool {
        if !self.keys.insert(item.key()) {
            sidebar_debug!("feed: duplicate item {:?}", item.link);
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn watchdog_elapsed(&mut self, token: WatchdogToken) -> bool {
        if token != self.watchdog || !self.loading {
            return false;
        }
        sidebar_warn!("feed: no response within watchdog window, clearing loading flag");
        self.loading = false;
        true
    }

    pub fn reset(&mut self) {
        let watchdog = self.watchdog + 1;
        *self = Self {
            watchdog,
            ..Self::default()
        };
    }
}
