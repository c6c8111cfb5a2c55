use sidebar_logging::{sidebar_debug, sidebar_info, sidebar_warn};

use crate::router::{route_frame, Route};
use crate::{
    AutoTradeRequest, ChannelKind, ChatMessage, ChatRequest, ConnectionStatus, ControlFrame, Effect,
    FollowupRequest, JobKind, JobRequest, Msg, ResearchRequest, SidebarState,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: SidebarState, msg: Msg) -> (SidebarState, Vec<Effect>) {
    let effects = match msg {
        Msg::FrameReceived(raw) => {
            if let Route::Deliver(kind, envelope) = route_frame(&raw) {
                state.deliver(kind, &envelope);
            }
            Vec::new()
        }
        Msg::ConnectionChanged(status) => {
            if status != state.connection() {
                sidebar_info!("connection {:?} -> {:?}", state.connection(), status);
            }
            state.set_connection(status);
            Vec::new()
        }
        Msg::EventContextDiscovered(slug) => {
            let slug = slug.trim().to_string();
            if slug.is_empty() || !state.set_event_slug(slug.clone()) {
                Vec::new()
            } else {
                vec![Effect::AnnounceEventContext(slug)]
            }
        }
        Msg::FeedRequested { market_title } => {
            let market_title = market_title.trim().to_string();
            if market_title.is_empty() {
                return (state, Vec::new());
            }
            if state.connection() != ConnectionStatus::Connected {
                sidebar_debug!("feed requested while {:?}", state.connection());
            }
            let token = state.feed_mut().begin_request(&market_title);
            state.mark_dirty_if(true);
            vec![
                Effect::SendControl(ControlFrame::feed_request(
                    market_title,
                    state.client_id().clone(),
                )),
                Effect::ArmFeedWatchdog { token },
            ]
        }
        Msg::ChatSubmitted(text) => {
            let text = text.trim().to_string();
            if text.is_empty() {
                return (state, Vec::new());
            }
            let request_id = state.chat_mut().begin_request(text);
            state.mark_dirty_if(true);
            vec![Effect::Launch(JobRequest::Chat(ChatRequest {
                client_id: state.client_id().clone(),
                request_id,
                messages: state.chat().transcript().to_vec(),
                event_slug: state.event_slug().map(str::to_owned),
            }))]
        }
        Msg::ResearchRequested {
            market_title,
            custom_notes,
        } => {
            let market_title = market_title.trim().to_string();
            if market_title.is_empty() {
                return (state, Vec::new());
            }
            let request_id = state
                .research_mut()
                .begin_request(&market_title, &custom_notes);
            // A follow-up conversation only makes sense against its own report.
            state.followup_mut().reset();
            state.mark_dirty_if(true);
            vec![Effect::Launch(JobRequest::Research(ResearchRequest {
                client_id: state.client_id().clone(),
                request_id,
                market_title,
                event_slug: state.event_slug().map(str::to_owned),
                custom_notes,
            }))]
        }
        Msg::FollowupSubmitted(text) => {
            let text = text.trim().to_string();
            if text.is_empty() {
                return (state, Vec::new());
            }
            let request_id = state.followup_mut().begin_request(text);
            state.mark_dirty_if(true);
            vec![Effect::Launch(JobRequest::Followup(FollowupRequest {
                client_id: state.client_id().clone(),
                request_id,
                messages: followup_history(&state),
            }))]
        }
        Msg::AutoTradeSubmitted(order) => {
            let order = match order.normalized() {
                Ok(order) => order,
                Err(reason) => {
                    sidebar_warn!("autotrade: order not placed: {}", reason);
                    return (state, Vec::new());
                }
            };
            let request_id = state.autotrade_mut().begin_request(order.clone());
            state.mark_dirty_if(true);
            vec![Effect::Launch(JobRequest::AutoTrade(AutoTradeRequest {
                client_id: state.client_id().clone(),
                request_id,
                market_slug: order.market_slug,
                x_handles: order.x_handles,
                condition: order.condition,
                amount: order.amount,
                limit: order.limit,
            }))]
        }
        Msg::AutoTradeCleared => {
            state.autotrade_mut().reset();
            state.mark_dirty_if(true);
            Vec::new()
        }
        Msg::ChannelReset(kind) => {
            match kind {
                ChannelKind::Feed => state.feed_mut().reset(),
                ChannelKind::Chat => state.chat_mut().reset(),
                ChannelKind::Research => {
                    state.research_mut().reset();
                    state.followup_mut().reset();
                }
                ChannelKind::ResearchFollowup => state.followup_mut().reset(),
            }
            state.mark_dirty_if(true);
            Vec::new()
        }
        Msg::TriggerAccepted { job, request_id } => {
            // Streaming jobs report progress on the socket; only autotrade
            // learns its outcome here.
            let changed = job == JobKind::AutoTrade && state.autotrade_mut().accepted(request_id);
            state.mark_dirty_if(changed);
            Vec::new()
        }
        Msg::TriggerFailed {
            job,
            request_id,
            message,
        } => {
            let changed = match job {
                JobKind::Chat => state.chat_mut().fail_request(request_id, &message),
                JobKind::Research => state.research_mut().fail_request(request_id, &message),
                JobKind::Followup => state.followup_mut().fail_request(request_id, &message),
                JobKind::AutoTrade => state.autotrade_mut().failed(request_id, &message),
            };
            if !changed {
                sidebar_debug!("{job}: ignoring failure of superseded request {request_id}");
            }
            state.mark_dirty_if(changed);
            Vec::new()
        }
        Msg::FeedWatchdogElapsed { token } => {
            let changed = state.feed_mut().watchdog_elapsed(token);
            state.mark_dirty_if(changed);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Conversation sent with a follow-up: the report as a synthetic assistant
/// turn, then the follow-up transcript including the new user turn.
fn followup_history(state: &SidebarState) -> Vec<ChatMessage> {
    let report = state.research().report();
    let transcript = state.followup().transcript();
    let mut messages = Vec::with_capacity(transcript.len() + 1);
    if !report.is_empty() {
        messages.push(ChatMessage::assistant(report));
    }
    messages.extend_from_slice(transcript);
    messages
}
