use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use sidebar_core::{
    update, ChannelKind, ClientId, ControlFrame, Effect, FeedItem, Msg, SidebarState,
};

fn frame(value: Value) -> Msg {
    Msg::FrameReceived(value.to_string())
}

fn request_feed(state: SidebarState, market: &str) -> (SidebarState, Vec<Effect>) {
    update(
        state,
        Msg::FeedRequested {
            market_title: market.to_string(),
        },
    )
}

fn item(link: &str, content: &str, sentiment: &str) -> FeedItem {
    FeedItem {
        link: Some(link.to_string()),
        content: Some(content.to_string()),
        sentiment: Some(sentiment.to_string()),
        ..FeedItem::default()
    }
}

#[test]
fn feed_request_sends_control_frame_and_arms_watchdog() {
    let state = SidebarState::new(ClientId::new("client_1_abc"));
    let (state, effects) = request_feed(state, "  Fed decision in January?  ");

    assert!(state.view().feed.loading);
    assert_eq!(
        effects,
        vec![
            Effect::SendControl(ControlFrame::feed_request(
                "Fed decision in January?",
                ClientId::new("client_1_abc"),
            )),
            Effect::ArmFeedWatchdog { token: 1 },
        ]
    );
}

#[test]
fn snapshot_then_duplicate_item_keeps_one_entry() {
    let (state, _) = request_feed(SidebarState::default(), "M");
    let (state, _) = update(
        state,
        frame(json!({
            "message_type": "feed",
            "type": "sentiment_items",
            "items": [{"link": "a", "content": "x", "sentiment": "Bullish"}],
        })),
    );
    let view = state.view();
    assert_eq!(view.feed.items, vec![item("a", "x", "Bullish")]);
    assert!(!view.feed.loading);

    let (state, _) = update(
        state,
        frame(json!({
            "message_type": "feed",
            "type": "sentiment_item",
            "item": {"link": "a", "content": "x", "sentiment": "Bullish"},
        })),
    );
    assert_eq!(state.view().feed.items.len(), 1);
}

#[test]
fn dedup_ignores_sentiment_and_source() {
    let (mut state, _) = request_feed(SidebarState::default(), "M");
    for (link, content, sentiment) in [
        ("a", "x", "Bullish"),
        ("a", "x", "Bearish"),
        ("a", "y", "Bullish"),
        ("b", "x", "Bullish"),
    ] {
        state = update(
            state,
            frame(json!({
                "message_type": "feed",
                "type": "sentiment_item",
                "item": {"link": link, "content": content, "sentiment": sentiment},
            })),
        )
        .0;
    }

    let items = state.view().feed.items;
    assert_eq!(
        items,
        vec![
            item("a", "x", "Bullish"),
            item("a", "y", "Bullish"),
            item("b", "x", "Bullish"),
        ]
    );
}

#[test]
fn snapshot_replaces_collection_and_resets_identity_index() {
    let (state, _) = request_feed(SidebarState::default(), "M");
    let (state, _) = update(
        state,
        frame(json!({"message_type": "feed", "type": "sentiment_item", "item": {"link": "old", "content": "o"}})),
    );
    let (state, _) = update(
        state,
        frame(json!({"message_type": "feed", "type": "sentiment_items", "items": [{"link": "new", "content": "n"}]})),
    );
    assert_eq!(state.view().feed.items.len(), 1);

    // The replaced item is no longer known, so it can come back.
    let (state, _) = update(
        state,
        frame(json!({"message_type": "feed", "type": "sentiment_item", "item": {"link": "old", "content": "o"}})),
    );
    assert_eq!(state.view().feed.items.len(), 2);
}

#[test]
fn error_clears_loading_but_keeps_items() {
    let (state, _) = request_feed(SidebarState::default(), "M");
    let (state, _) = update(
        state,
        frame(json!({"message_type": "feed", "type": "sentiment_item", "item": {"link": "a", "content": "x"}})),
    );
    let (state, _) = request_feed(state, "M");
    assert!(state.view().feed.loading);

    let (state, _) = update(
        state,
        frame(json!({"message_type": "feed", "type": "error", "error": "reddit unavailable"})),
    );
    let view = state.view();
    assert!(!view.feed.loading);
    assert_eq!(view.feed.items.len(), 1);
    assert_eq!(view.feed.last_error.as_deref(), Some("reddit unavailable"));
}

#[test]
fn watchdog_clears_spinner_only_for_latest_request() {
    let (state, effects) = request_feed(SidebarState::default(), "M");
    assert!(effects.contains(&Effect::ArmFeedWatchdog { token: 1 }));
    let (state, effects) = request_feed(state, "M");
    assert!(effects.contains(&Effect::ArmFeedWatchdog { token: 2 }));

    let (state, _) = update(state, Msg::FeedWatchdogElapsed { token: 1 });
    assert!(state.view().feed.loading);

    let (mut state, _) = update(state, Msg::FeedWatchdogElapsed { token: 2 });
    assert!(!state.view().feed.loading);
    assert!(state.consume_dirty());

    // Expiry after the flag is already clear changes nothing.
    let (mut state, _) = update(state, Msg::FeedWatchdogElapsed { token: 2 });
    assert!(!state.consume_dirty());
}

#[test]
fn switching_market_clears_items() {
    let (state, _) = request_feed(SidebarState::default(), "M");
    let (state, _) = update(
        state,
        frame(json!({"message_type": "feed", "type": "sentiment_item", "item": {"link": "a", "content": "x"}})),
    );
    let (state, _) = request_feed(state, "M");
    assert_eq!(state.view().feed.items.len(), 1);

    let (state, _) = request_feed(state, "Other market");
    let view = state.view();
    assert!(view.feed.items.is_empty());
    assert_eq!(view.feed.market_title.as_deref(), Some("Other market"));
}

#[test]
fn blank_market_is_ignored() {
    let (state, effects) = request_feed(SidebarState::default(), "   ");
    assert!(effects.is_empty());
    assert!(!state.view().feed.loading);
}

#[test]
fn reset_invalidates_pending_watchdog() {
    let (state, _) = request_feed(SidebarState::default(), "M");
    let (state, _) = update(state, Msg::ChannelReset(ChannelKind::Feed));
    let view = state.view();
    assert!(!view.feed.loading);
    assert!(view.feed.market_title.is_none());

    let (state, effects) = request_feed(state, "M");
    assert!(effects.contains(&Effect::ArmFeedWatchdog { token: 3 }));
    let (state, _) = update(state, Msg::FeedWatchdogElapsed { token: 1 });
    assert!(state.view().feed.loading);
}

#[test]
fn snapshot_with_repeated_identity_keeps_first_copy() {
    let (state, _) = request_feed(SidebarState::default(), "M");
    let (state, _) = update(
        state,
        frame(json!({
            "message_type": "feed",
            "type": "sentiment_items",
            "items": [
                {"link": "a", "content": "x", "sentiment": "Bullish"},
                {"link": "b", "content": "y", "sentiment": "Neutral"},
                {"link": "a", "content": "x", "sentiment": "Bearish"},
            ],
        })),
    );
    assert_eq!(
        state.view().feed.items,
        vec![item("a", "x", "Bullish"), item("b", "y", "Neutral")]
    );

    // The index matches the stored items, so a later single item is still deduped.
    let (state, _) = update(
        state,
        frame(json!({
            "message_type": "feed",
            "type": "sentiment_item",
            "item": {"link": "b", "content": "y", "sentiment": "Bullish"},
        })),
    );
    assert_eq!(state.view().feed.items.len(), 2);
}

#[test]
fn item_attribution_is_kept() {
    let (state, _) = request_feed(SidebarState::default(), "M");
    let (state, _) = update(
        state,
        frame(json!({
            "message_type": "feed",
            "type": "sentiment_item",
            "item": {
                "link": "https://x.com/fedwatch/status/1",
                "content": "c",
                "source": "X",
                "meta": "@fedwatch",
                "sentiment": "Bullish",
                "reasoning": "r",
            },
        })),
    );
    let items = state.view().feed.items;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].meta.as_deref(), Some("@fedwatch"));
    assert_eq!(items[0].source.as_deref(), Some("X"));
}
