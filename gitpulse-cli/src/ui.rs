use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use gitpulse_core::RepoEvent;

use crate::app::App;
use crate::theme;

const EMPTY_STATE: &str = "No events yet. Waiting for repository activity.";

pub fn draw(frame: &mut Frame, app: &App) {
    // Paint the whole frame with FORM bg so no terminal background bleeds through
    frame.render_widget(Block::default().style(theme::list_bg()), frame.area());

    let error_h = if app.error.is_some() { 1 } else { 0 };

    let chunks = Layout::vertical([
        Constraint::Length(1),       // status bar
        Constraint::Min(3),          // event cards
        Constraint::Length(error_h), // fetch failure banner
        Constraint::Length(1),       // help bar
    ])
    .split(frame.area());

    draw_status_bar(frame, app, chunks[0]);
    draw_events(frame, app, chunks[1]);
    draw_error_banner(frame, app, chunks[2]);
    draw_help_bar(frame, app, chunks[3]);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(" gitpulse", theme::app_title()),
        Span::styled(theme::STATUS_SEP, theme::status_separator()),
        Span::styled(app.endpoint.as_str(), theme::endpoint()),
    ];

    let stats = format!(
        "{} events{}updated {}",
        app.stats.total_events,
        theme::STATUS_SEP,
        app.stats.last_update_label()
    );
    let state = if app.loading {
        format!("{} fetching", spinner_glyph(app.tick))
    } else if app.polling {
        "live".to_string()
    } else {
        "paused".to_string()
    };
    let state_style = if app.loading {
        theme::spinner()
    } else if app.polling {
        theme::live_indicator()
    } else {
        theme::paused_indicator()
    };

    // Calculate padding to right-align the stats block
    let left_width = spans_width(&spans);
    let right_width = stats.width() + theme::STATUS_SEP.width() + state.width() + 1;
    let pad = (area.width as usize).saturating_sub(left_width + right_width);
    if pad > 0 {
        spans.push(Span::styled(" ".repeat(pad), theme::bar_bg()));
    }

    spans.push(Span::styled(stats, theme::stats_text()));
    spans.push(Span::styled(theme::STATUS_SEP, theme::status_separator()));
    spans.push(Span::styled(state, state_style));
    spans.push(Span::styled(" ", theme::bar_bg()));

    let bar = Paragraph::new(Line::from(spans)).style(theme::bar_bg());
    frame.render_widget(bar, area);
}

fn draw_events(frame: &mut Frame, app: &App, area: Rect) {
    if app.events.is_empty() {
        let placeholder = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  {EMPTY_STATE}"),
                theme::empty_state(),
            )),
        ])
        .style(theme::list_bg());
        frame.render_widget(placeholder, area);
        return;
    }

    let lines = list_lines(&app.events, area.width as usize);
    let viewport = area.height as usize;
    // The main loop clamps scroll_offset before drawing; min() here keeps a
    // shrunk list from pointing past the end mid-frame.
    let scroll = app.scroll_offset.min(lines.len().saturating_sub(viewport));
    let visible: Vec<Line> = lines.into_iter().skip(scroll).take(viewport).collect();

    let paragraph = Paragraph::new(visible).style(theme::list_bg());
    frame.render_widget(paragraph, area);
}

fn draw_error_banner(frame: &mut Frame, app: &App, area: Rect) {
    let Some(message) = &app.error else {
        return;
    };
    let banner = Paragraph::new(Line::from(Span::styled(
        format!(" ✗ {message}"),
        theme::error_banner(),
    )))
    .style(theme::bar_bg());
    frame.render_widget(banner, area);
}

fn draw_help_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(" r", theme::help_key()),
        Span::styled(" refresh  ", theme::help_desc()),
        Span::styled("c", theme::help_key()),
        Span::styled(" clear  ", theme::help_desc()),
        Span::styled("p", theme::help_key()),
        Span::styled(
            if app.polling { " pause  " } else { " resume  " },
            theme::help_desc(),
        ),
        Span::styled("\u{2191}/\u{2193}", theme::help_key()),
        Span::styled(" scroll  ", theme::help_desc()),
        Span::styled("q", theme::help_key()),
        Span::styled(" quit", theme::help_desc()),
    ];
    if !app.focused {
        spans.push(Span::styled("  unfocused", theme::paused_indicator()));
    }

    let bar = Paragraph::new(Line::from(spans)).style(theme::bar_bg());
    frame.render_widget(bar, area);
}

// ── Card rendering ──────────────────────────────────────────────────

/// Lines for one event card: accent-barred header, wrapped message, and
/// delivery id. The accent color tracks the action kind.
pub fn card_lines(event: &RepoEvent, width: usize) -> Vec<Line<'static>> {
    let accent = theme::action_accent(event.action());
    let bar = format!("{} ", theme::CARD_BAR);

    let mut lines = vec![Line::from(vec![
        Span::styled(bar.clone(), theme::card_accent(accent)),
        Span::styled(event.action_label().to_string(), theme::card_accent(accent)),
        Span::styled(theme::STATUS_SEP, theme::status_separator()),
        Span::styled(event.formatted_time(), theme::card_time()),
    ])];

    let message = event.message();
    if !message.is_empty() {
        for part in wrap_text(&message, width.saturating_sub(2)) {
            lines.push(Line::from(vec![
                Span::styled(bar.clone(), Style::default().fg(accent)),
                Span::styled(part, theme::card_message()),
            ]));
        }
    }

    lines.push(Line::from(vec![
        Span::styled(bar, Style::default().fg(accent)),
        Span::styled(
            format!("request id: {}", event.request_id_label()),
            theme::card_detail(),
        ),
    ]));

    lines
}

/// All cards concatenated in server order, one blank line between cards.
pub fn list_lines(events: &[RepoEvent], width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for event in events {
        lines.extend(card_lines(event, width));
        lines.push(Line::from(""));
    }
    lines
}

/// Greatest useful scroll offset for the current content and frame size.
pub fn max_scroll(app: &App, frame_width: u16, frame_height: u16) -> usize {
    let error_h: u16 = if app.error.is_some() { 1 } else { 0 };
    let viewport = frame_height.saturating_sub(2 + error_h) as usize;
    let total = list_lines(&app.events, frame_width as usize).len();
    total.saturating_sub(viewport)
}

/// Greedy word wrap by display width. Oversized words are hard-broken so
/// no line ever overflows the card body.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = word.width();
        if current_width > 0 && current_width + 1 + word_width > width {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }

        if word_width > width {
            for ch in word.chars() {
                let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
                if current_width > 0 && current_width + ch_width > width {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(ch);
                current_width += ch_width;
            }
            continue;
        }

        if current_width > 0 {
            current.push(' ');
            current_width += 1;
        }
        current.push_str(word);
        current_width += word_width;
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Total display width of a span run. Wide characters (for example a CJK
/// hostname in the endpoint) count as two columns, matching the terminal.
fn spans_width(spans: &[Span]) -> usize {
    spans.iter().map(|s| s.content.as_ref().width()).sum()
}

fn spinner_glyph(tick: usize) -> char {
    // Four angles of the slash rotating in place; two 100ms ticks per
    // angle gives an 800ms full rotation.
    const ANGLES: &[char] = &['\u{2572}', '\u{2500}', '\u{2571}', '\u{2502}'];
    ANGLES[(tick / 2) % ANGLES.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitpulse_core::PollerEvent;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn push_event(author: &str) -> RepoEvent {
        RepoEvent {
            request_id: Some("r1".to_string()),
            author: author.to_string(),
            action: Some("PUSH".to_string()),
            to_branch: "main".to_string(),
            timestamp: Some("2021-04-01T21:30:00Z".to_string()),
            ..RepoEvent::default()
        }
    }

    // ── cards ──

    #[test]
    fn card_has_header_message_and_request_id() {
        let lines = card_lines(&push_event("alice"), 120);
        assert_eq!(lines.len(), 3);
        assert_eq!(
            line_text(&lines[0]),
            "\u{258c} PUSH \u{b7} 1st April 2021 - 9:30 PM UTC"
        );
        assert_eq!(
            line_text(&lines[1]),
            "\u{258c} alice pushed to main on 1st April 2021 - 9:30 PM UTC"
        );
        assert_eq!(line_text(&lines[2]), "\u{258c} request id: r1");
    }

    #[test]
    fn unknown_action_card_skips_the_message_line() {
        let event = RepoEvent {
            action: Some("DELETE".to_string()),
            ..push_event("alice")
        };
        let lines = card_lines(&event, 120);
        assert_eq!(lines.len(), 2);
        assert!(line_text(&lines[0]).contains("DELETE"));
        assert!(line_text(&lines[1]).contains("request id"));
    }

    #[test]
    fn narrow_width_wraps_the_message() {
        let lines = card_lines(&push_event("alice"), 30);
        assert!(lines.len() > 3);
        // Message body lines (between header and request id) fit the width.
        for line in &lines[1..lines.len() - 1] {
            assert!(line_text(line).chars().count() <= 30);
        }
    }

    #[test]
    fn list_keeps_server_order_with_blank_separators() {
        let events = vec![push_event("alice"), push_event("bob")];
        let lines = list_lines(&events, 120);
        assert_eq!(lines.len(), 8);
        assert!(line_text(&lines[1]).contains("alice"));
        assert_eq!(line_text(&lines[3]), "");
        assert!(line_text(&lines[5]).contains("bob"));
    }

    // ── scroll ──

    #[test]
    fn max_scroll_accounts_for_chrome_and_banner() {
        let mut app = App::new(String::new());
        app.apply(PollerEvent::Fetched {
            events: (0..10).map(|i| push_event(&format!("dev{i}"))).collect(),
        });

        // 10 cards at 4 lines each, 24-row frame, 2 chrome rows.
        assert_eq!(max_scroll(&app, 120, 24), 40 - 22);

        app.error = Some("Failed to fetch events: HTTP status 500".to_string());
        assert_eq!(max_scroll(&app, 120, 24), 40 - 21);

        app.events.clear();
        assert_eq!(max_scroll(&app, 120, 24), 0);
    }

    // ── wrapping ──

    #[test]
    fn wrap_respects_width() {
        let wrapped = wrap_text("alice pushed to main on 1st April 2021", 16);
        assert!(wrapped.len() > 1);
        for line in &wrapped {
            assert!(line.width() <= 16, "{line:?} overflows");
        }
        assert_eq!(wrapped.join(" "), "alice pushed to main on 1st April 2021");
    }

    #[test]
    fn short_text_stays_on_one_line() {
        assert_eq!(wrap_text("short", 20), vec!["short".to_string()]);
    }

    #[test]
    fn oversized_word_is_hard_broken() {
        let wrapped = wrap_text("deadbeefdeadbeefdeadbeef", 8);
        assert_eq!(wrapped.len(), 3);
        for line in &wrapped {
            assert!(line.width() <= 8);
        }
    }

    #[test]
    fn empty_text_produces_no_lines() {
        assert!(wrap_text("", 20).is_empty());
        assert!(wrap_text("   ", 20).is_empty());
    }

    // ── status bar widths ──

    #[test]
    fn spans_width_counts_display_columns() {
        let spans = [Span::raw(" gitpulse"), Span::raw(theme::STATUS_SEP)];
        assert_eq!(spans_width(&spans), 12);

        // Wide characters occupy two columns each, not one per char.
        let endpoint = "http://日本:5000/api/events";
        let wide = [Span::raw(endpoint)];
        assert_eq!(spans_width(&wide), 27);
        assert_eq!(endpoint.chars().count(), 25);
    }

    // ── spinner ──

    #[test]
    fn spinner_rotates_every_other_tick() {
        assert_eq!(spinner_glyph(0), spinner_glyph(1));
        assert_ne!(spinner_glyph(1), spinner_glyph(2));
        assert_eq!(spinner_glyph(0), spinner_glyph(8));
    }
}
