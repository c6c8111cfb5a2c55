use sidebar_core::{
    AutoTradePhase, AutoTradeView, ConnectionStatus, ConversationView, FeedItem, Phase,
    SidebarViewModel,
};

const PREVIEW_CHARS: usize = 80;

/// Text panels for a headless session: one line per panel.
pub fn render(view: &SidebarViewModel) -> Vec<String> {
    let connection_label = match view.connection {
        ConnectionStatus::Connecting => "connecting",
        ConnectionStatus::Connected => "connected",
        ConnectionStatus::Error => "error",
        ConnectionStatus::Disconnected => "disconnected",
    };
    let mut lines = vec![format!(
        "session {} | {} | event {}",
        view.client_id,
        connection_label,
        view.event_slug.as_deref().unwrap_or("-")
    )];

    let feed = &view.feed;
    let mut feed_line = format!(
        "feed [{}] {} items{}",
        feed.market_title.as_deref().unwrap_or("-"),
        feed.items.len(),
        if feed.loading { " (loading)" } else { "" }
    );
    if let Some(latest) = feed.items.last() {
        feed_line.push_str(&format!(" | latest {}", feed_item_label(latest)));
    }
    if let Some(err) = &feed.last_error {
        feed_line.push_str(&format!(" error: {err}"));
    }
    lines.push(feed_line);

    lines.push(conversation_line("chat", &view.chat));

    let research = &view.research;
    let body = if research.is_generating && research.live_text.is_empty() {
        research.thinking_log.last().map(String::as_str).unwrap_or("")
    } else {
        research.report.as_str()
    };
    let mut research_line = format!(
        "research [{}] {} {}",
        research.market_title.as_deref().unwrap_or("-"),
        phase_label(research.phase),
        preview(body)
    );
    if let Some(recommendation) = research.recommendation {
        research_line.push_str(&format!(" => {}", recommendation.as_str()));
    }
    if !research.citations.is_empty() {
        research_line.push_str(&format!(" ({} citations)", research.citations.len()));
    }
    lines.push(research_line);

    lines.push(conversation_line("follow-up", &view.followup));
    lines.push(autotrade_line(&view.autotrade));
    lines
}

/// `X @user Bullish: text`, skipping whatever the item lacks.
fn feed_item_label(item: &FeedItem) -> String {
    let attribution: Vec<&str> = [&item.source, &item.meta, &item.sentiment]
        .into_iter()
        .filter_map(|field| field.as_deref())
        .collect();
    format!(
        "{}: {}",
        attribution.join(" "),
        preview(item.content.as_deref().unwrap_or(""))
    )
}

fn autotrade_line(view: &AutoTradeView) -> String {
    let status = match &view.phase {
        AutoTradePhase::Idle => "idle".to_string(),
        AutoTradePhase::Submitting => "submitting".to_string(),
        AutoTradePhase::Accepted => "accepted".to_string(),
        AutoTradePhase::Rejected(reason) => format!("rejected ({reason})"),
    };
    match &view.order {
        Some(order) => format!(
            "autotrade {status} [{}] {} @ {} when {}{}",
            order.market_slug,
            order.amount,
            order.limit,
            preview(&order.condition),
            if order.x_handles.is_empty() {
                String::new()
            } else {
                format!(" watching {}", order.x_handles.join(", "))
            }
        ),
        None => format!("autotrade {status}"),
    }
}

fn conversation_line(label: &str, view: &ConversationView) -> String {
    let last = view
        .transcript
        .last()
        .map(|message| message.content.as_str())
        .unwrap_or("");
    format!(
        "{label} {} {} turns {}",
        phase_label(view.phase),
        view.transcript.len(),
        preview(last)
    )
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "idle",
        Phase::Thinking => "thinking",
        Phase::Streaming => "streaming",
        Phase::Complete => "complete",
        Phase::Error => "error",
    }
}

fn preview(text: &str) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= PREVIEW_CHARS {
        return flat;
    }
    let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
    format!("{cut}...")
}
