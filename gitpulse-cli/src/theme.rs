use gitpulse_core::EventAction;
use ratatui::style::{Color, Modifier, Style};

// ── Formwork: warm olive-tinted blacks ──────────────────────────────
pub const FORM: Color = Color::Rgb(14, 13, 11);
pub const FORM_RAISED: Color = Color::Rgb(20, 20, 18);

// ── Ash: structural greys ──────────────────────────────────────────
pub const ASH_MID: Color = Color::Rgb(74, 74, 68);
pub const ASH_TEXT: Color = Color::Rgb(90, 90, 80);

// ── Chalk: text hierarchy ──────────────────────────────────────────
pub const CHALK_DIM: Color = Color::Rgb(122, 122, 112);
pub const CHALK: Color = Color::Rgb(232, 228, 208);

// ── Accent colors ──────────────────────────────────────────────────
pub const SODIUM: Color = Color::Rgb(232, 163, 60);
pub const LICHEN: Color = Color::Rgb(138, 158, 108);
pub const COPPER: Color = Color::Rgb(196, 124, 82);
pub const ERROR: Color = Color::Rgb(204, 68, 68);

// ── Character constants ────────────────────────────────────────────
pub const CARD_BAR: &str = "▌";
pub const STATUS_SEP: &str = " · ";

// ── Style helpers ──────────────────────────────────────────────────

/// Accent color for an event's action kind.
pub fn action_accent(action: Option<EventAction>) -> Color {
    match action {
        Some(EventAction::Push) => LICHEN,
        Some(EventAction::PullRequest) => SODIUM,
        Some(EventAction::Merge) => COPPER,
        None => ASH_TEXT,
    }
}

/// Card accent bar and action label
pub fn card_accent(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Card timestamp in the header line
pub fn card_time() -> Style {
    Style::default().fg(ASH_TEXT)
}

/// Card message body
pub fn card_message() -> Style {
    Style::default().fg(CHALK)
}

/// Card delivery id line
pub fn card_detail() -> Style {
    Style::default().fg(CHALK_DIM)
}

/// "No events yet" placeholder
pub fn empty_state() -> Style {
    Style::default().fg(ASH_TEXT)
}

/// Fetch failure banner
pub fn error_banner() -> Style {
    Style::default().fg(ERROR)
}

/// "gitpulse" title in status bar
pub fn app_title() -> Style {
    Style::default().fg(SODIUM).add_modifier(Modifier::BOLD)
}

/// Polled endpoint in status bar
pub fn endpoint() -> Style {
    Style::default().fg(CHALK_DIM)
}

/// Status bar separator ( · )
pub fn status_separator() -> Style {
    Style::default().fg(ASH_MID)
}

/// Event count and last-update stats
pub fn stats_text() -> Style {
    Style::default().fg(CHALK_DIM)
}

/// "live" indicator while polling
pub fn live_indicator() -> Style {
    Style::default().fg(LICHEN)
}

/// "paused" indicator while polling is off
pub fn paused_indicator() -> Style {
    Style::default().fg(SODIUM).add_modifier(Modifier::BOLD)
}

/// Spinner character
pub fn spinner() -> Style {
    Style::default().fg(SODIUM)
}

/// Help bar key labels
pub fn help_key() -> Style {
    Style::default().fg(SODIUM).add_modifier(Modifier::BOLD)
}

/// Help bar descriptions
pub fn help_desc() -> Style {
    Style::default().fg(ASH_MID)
}

/// Status bar and help bar background
pub fn bar_bg() -> Style {
    Style::default().bg(FORM_RAISED)
}

/// Event list background
pub fn list_bg() -> Style {
    Style::default().bg(FORM)
}
