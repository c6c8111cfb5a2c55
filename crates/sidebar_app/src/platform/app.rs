use std::collections::VecDeque;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use sidebar_core::{
    update, AutoTradeOrder, ConnectionStatus, Msg, Phase, SidebarState, SidebarViewModel,
};
use sidebar_engine::ClientRegistry;
use sidebar_logging::{sidebar_info, sidebar_warn};

use super::cli::Cli;
use super::config::AppConfig;
use super::effects::EffectRunner;
use super::ui::render::render;

const TICK: Duration = Duration::from_millis(75);

/// User intents given on the command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionPlan {
    pub event_slug: Option<String>,
    pub feed_market: Option<String>,
    pub chat: Vec<String>,
    pub research: Option<ResearchIntent>,
    pub followup: Option<String>,
    pub autotrade: Option<AutoTradeOrder>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResearchIntent {
    pub market_title: String,
    pub custom_notes: String,
}

/// Releases the plan's intents as messages once the session can act on them.
///
/// Everything but the follow-up goes out on the first connection. The
/// follow-up waits for a finished report when research was requested.
#[derive(Debug)]
struct Script {
    pending: Option<SessionPlan>,
    followup: Option<String>,
    awaiting_report: bool,
}

impl Script {
    fn new(plan: SessionPlan) -> Self {
        let awaiting_report = plan.research.is_some();
        Self {
            followup: plan.followup.clone(),
            pending: Some(plan),
            awaiting_report,
        }
    }

    fn next(&mut self, view: &SidebarViewModel) -> Vec<Msg> {
        let mut msgs = Vec::new();
        if view.connection == ConnectionStatus::Connected {
            if let Some(plan) = self.pending.take() {
                msgs.extend(plan.event_slug.map(Msg::EventContextDiscovered));
                msgs.extend(
                    plan.feed_market
                        .map(|market_title| Msg::FeedRequested { market_title }),
                );
                msgs.extend(plan.chat.into_iter().map(Msg::ChatSubmitted));
                msgs.extend(plan.research.map(|intent| Msg::ResearchRequested {
                    market_title: intent.market_title,
                    custom_notes: intent.custom_notes,
                }));
                msgs.extend(plan.autotrade.map(Msg::AutoTradeSubmitted));
                // Let the research request land before judging its phase.
                return msgs;
            }
        }
        if self.pending.is_none() && self.followup.is_some() {
            let ready = match view.research.phase {
                Phase::Complete => true,
                Phase::Error => {
                    sidebar_warn!("research failed, follow-up not sent");
                    self.followup = None;
                    false
                }
                _ => !self.awaiting_report,
            };
            if ready {
                msgs.extend(self.followup.take().map(Msg::FollowupSubmitted));
            }
        }
        msgs
    }
}

struct Session {
    state: SidebarState,
    runner: EffectRunner,
}

impl Session {
    fn dispatch(&mut self, msg: Msg) -> Option<SidebarViewModel> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.runner.enqueue(effects);
        let was_dirty = state.consume_dirty();
        let view = state.view();
        self.state = state;
        was_dirty.then_some(view)
    }
}

pub fn run_app() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, source) = AppConfig::load(cli.config.as_deref())?;
    config.apply_overrides(cli.overrides());
    sidebar_logging::initialize(
        config.log_target.into(),
        config.level_filter()?,
        &config.log_file,
    );
    sidebar_info!("configuration from {}", source);

    let duration = cli.duration();
    run_session(&config, cli.into_plan(), duration)
}

/// Runs one headless session for `duration`, logging the panels whenever
/// they change.
pub fn run_session(config: &AppConfig, plan: SessionPlan, duration: Duration) -> Result<()> {
    let registry = ClientRegistry::new();
    let client_id = registry.client_id().clone();
    sidebar_logging::set_session_tag(client_id.as_str());
    sidebar_info!("session starting against {}", config.ws_url);

    let runner = EffectRunner::new(config.engine_settings(), client_id.clone())?;
    let mut session = Session {
        state: SidebarState::new(client_id),
        runner,
    };
    let mut script = Script::new(plan);

    let deadline = Instant::now() + duration;
    loop {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        let wait = TICK.min(deadline - now);
        let msg = session.runner.next_msg(wait).unwrap_or(Msg::Tick);
        let mut inbox = VecDeque::from([msg]);
        while let Some(msg) = inbox.pop_front() {
            if let Some(view) = session.dispatch(msg) {
                for line in render(&view) {
                    sidebar_info!("{}", line);
                }
            }
            inbox.extend(script.next(&session.state.view()));
        }
    }

    sidebar_info!("session finished");
    session.runner.shutdown();
    Ok(())
}
