use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use sidebar_core::AutoTradeOrder;

use super::app::{ResearchIntent, SessionPlan};
use super::config::{ConfigOverrides, LogTarget};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogArg {
    File,
    Terminal,
    Both,
}

impl From<LogArg> for LogTarget {
    fn from(arg: LogArg) -> Self {
        match arg {
            LogArg::File => LogTarget::File,
            LogArg::Terminal => LogTarget::Terminal,
            LogArg::Both => LogTarget::Both,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "sidebar", version, about = "Headless market sidebar client")]
pub struct Cli {
    /// RON configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    ws_url: Option<String>,
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long, value_enum)]
    log: Option<LogArg>,
    #[arg(long)]
    log_level: Option<String>,
    /// Event the user is looking at; announced on every connection.
    #[arg(long)]
    event_slug: Option<String>,
    /// Open the live feed for this market.
    #[arg(long)]
    feed: Option<String>,
    /// Chat turn to send; may be repeated.
    #[arg(long)]
    chat: Vec<String>,
    /// Start deep research on this market.
    #[arg(long)]
    research: Option<String>,
    #[arg(long, default_value = "", requires = "research")]
    notes: String,
    /// Question about the research report, sent once it completes.
    #[arg(long)]
    followup: Option<String>,
    /// Place a conditional order on this market slug.
    #[arg(long, requires_all = ["condition", "amount", "limit"])]
    autotrade: Option<String>,
    /// X handle to watch for the order; may be repeated.
    #[arg(long, requires = "autotrade")]
    x_handle: Vec<String>,
    #[arg(long, requires = "autotrade")]
    condition: Option<String>,
    #[arg(long, requires = "autotrade")]
    amount: Option<f64>,
    /// Worst acceptable price, between 0 and 1.
    #[arg(long, requires = "autotrade")]
    limit: Option<f64>,
    /// How long to keep the session open.
    #[arg(long, default_value_t = 60)]
    duration_secs: u64,
}

impl Cli {
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }

    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            ws_url: self.ws_url.clone(),
            api_base_url: self.api_url.clone(),
            log_target: self.log.map(LogTarget::from),
            log_level: self.log_level.clone(),
        }
    }

    pub fn into_plan(self) -> SessionPlan {
        let Cli {
            event_slug,
            feed,
            chat,
            research,
            notes,
            followup,
            autotrade,
            x_handle,
            condition,
            amount,
            limit,
            ..
        } = self;
        SessionPlan {
            event_slug,
            feed_market: feed,
            chat,
            research: research.map(|market_title| ResearchIntent {
                market_title,
                custom_notes: notes,
            }),
            followup,
            autotrade: autotrade.map(|market_slug| AutoTradeOrder {
                market_slug,
                x_handles: x_handle,
                condition: condition.unwrap_or_default(),
                amount: amount.unwrap_or_default(),
                limit: limit.unwrap_or_default(),
            }),
        }
    }
}
