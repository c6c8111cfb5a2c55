use pretty_assertions::assert_eq;
use sidebar_core::{
    update, AutoTradeOrder, AutoTradePhase, AutoTradeRequest, ClientId, Effect, JobKind,
    JobRequest, Msg, SidebarState,
};

fn order() -> AutoTradeOrder {
    AutoTradeOrder {
        market_slug: " fed-decision-in-january ".to_string(),
        x_handles: vec!["@fedwatch".to_string(), "  ".to_string()],
        condition: "a handle reports a cut".to_string(),
        amount: 25.0,
        limit: 0.62,
    }
}

#[test]
fn order_launches_with_normalized_fields() {
    let state = SidebarState::new(ClientId::new("client_1_abc"));
    let (mut state, effects) = update(state, Msg::AutoTradeSubmitted(order()));

    assert_eq!(
        effects,
        vec![Effect::Launch(JobRequest::AutoTrade(AutoTradeRequest {
            client_id: ClientId::new("client_1_abc"),
            request_id: 1,
            market_slug: "fed-decision-in-january".to_string(),
            x_handles: vec!["@fedwatch".to_string()],
            condition: "a handle reports a cut".to_string(),
            amount: 25.0,
            limit: 0.62,
        }))]
    );
    let view = state.view();
    assert_eq!(view.autotrade.phase, AutoTradePhase::Submitting);
    assert_eq!(
        view.autotrade.order.map(|order| order.market_slug),
        Some("fed-decision-in-january".to_string())
    );
    assert!(state.consume_dirty());
}

#[test]
fn invalid_orders_are_not_placed() {
    let cases = [
        AutoTradeOrder {
            market_slug: "   ".to_string(),
            ..order()
        },
        AutoTradeOrder {
            condition: String::new(),
            ..order()
        },
        AutoTradeOrder {
            amount: 0.0,
            ..order()
        },
        AutoTradeOrder {
            amount: f64::NAN,
            ..order()
        },
        AutoTradeOrder {
            limit: 1.5,
            ..order()
        },
        AutoTradeOrder {
            limit: 0.0,
            ..order()
        },
    ];
    for case in cases {
        let (mut state, effects) = update(SidebarState::default(), Msg::AutoTradeSubmitted(case));
        assert!(effects.is_empty());
        assert_eq!(state.view().autotrade.phase, AutoTradePhase::Idle);
        assert!(!state.consume_dirty());
    }
}

#[test]
fn acceptance_and_rejection_follow_latest_order() {
    let (state, _) = update(SidebarState::default(), Msg::AutoTradeSubmitted(order()));
    let (state, _) = update(state, Msg::AutoTradeSubmitted(order()));

    // Outcome of the first order arrives after it was superseded.
    let (state, _) = update(
        state,
        Msg::TriggerFailed {
            job: JobKind::AutoTrade,
            request_id: 1,
            message: "http status 500".to_string(),
        },
    );
    assert_eq!(state.view().autotrade.phase, AutoTradePhase::Submitting);

    let (state, _) = update(
        state,
        Msg::TriggerAccepted {
            job: JobKind::AutoTrade,
            request_id: 2,
        },
    );
    assert_eq!(state.view().autotrade.phase, AutoTradePhase::Accepted);

    let (state, _) = update(state, Msg::AutoTradeSubmitted(order()));
    let (state, _) = update(
        state,
        Msg::TriggerFailed {
            job: JobKind::AutoTrade,
            request_id: 3,
            message: "http status 422".to_string(),
        },
    );
    assert_eq!(
        state.view().autotrade.phase,
        AutoTradePhase::Rejected("http status 422".to_string())
    );
}

#[test]
fn acceptance_of_streaming_jobs_changes_nothing() {
    let (mut state, _) = update(SidebarState::default(), Msg::ChatSubmitted("hi".into()));
    state.consume_dirty();
    let before = state.clone();

    let (mut state, effects) = update(
        state,
        Msg::TriggerAccepted {
            job: JobKind::Chat,
            request_id: 1,
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state, before);
    assert!(!state.consume_dirty());
}

#[test]
fn clearing_drops_late_outcome() {
    let (state, _) = update(SidebarState::default(), Msg::AutoTradeSubmitted(order()));
    let (state, _) = update(state, Msg::AutoTradeCleared);
    assert_eq!(state.view().autotrade.order, None);

    let (state, _) = update(
        state,
        Msg::TriggerAccepted {
            job: JobKind::AutoTrade,
            request_id: 1,
        },
    );
    assert_eq!(state.view().autotrade.phase, AutoTradePhase::Idle);
}
