use gitpulse_core::{DashboardStats, PollerEvent, RepoEvent};

/// Dashboard state. The main loop mutates it and `ui` renders it; nothing
/// here touches the terminal.
pub struct App {
    /// Full URL being polled, shown in the status bar.
    pub endpoint: String,
    /// Most recently fetched event list, newest first (server order).
    pub events: Vec<RepoEvent>,
    pub stats: DashboardStats,
    /// A fetch is in flight.
    pub loading: bool,
    /// Banner text from the last failed fetch. Cleared when the next
    /// fetch starts.
    pub error: Option<String>,
    /// The recurring fetch is enabled.
    pub polling: bool,
    /// Terminal has focus (polling pauses while unfocused).
    pub focused: bool,
    /// First visual line of the event list currently shown.
    pub scroll_offset: usize,
    /// 100ms animation counter driving the spinner.
    pub tick: usize,
    pub dirty: bool,
}

impl App {
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            events: Vec::new(),
            stats: DashboardStats::default(),
            loading: false,
            error: None,
            polling: false,
            focused: true,
            scroll_offset: 0,
            tick: 0,
            dirty: true,
        }
    }

    /// Apply one poller event.
    ///
    /// A starting fetch shows the loading indicator and drops the error
    /// banner; a failed fetch keeps the previously rendered list.
    pub fn apply(&mut self, event: PollerEvent) {
        match event {
            PollerEvent::FetchStarted => {
                self.loading = true;
                self.error = None;
            }
            PollerEvent::Fetched { events } => {
                self.stats.record_fetch(events.len());
                self.events = events;
                self.loading = false;
            }
            PollerEvent::FetchFailed { message } => {
                self.error = Some(message);
                self.loading = false;
            }
        }
        self.dirty = true;
    }

    /// Manual clear: wipe the rendered list and zero the displayed count.
    /// Purely local; no network call, and the poll timer is untouched.
    pub fn clear(&mut self) {
        self.events.clear();
        self.stats.clear();
        self.scroll_offset = 0;
        self.dirty = true;
    }

    pub fn bump_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        if self.loading {
            self.dirty = true;
        }
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
        self.dirty = true;
    }

    /// Unclamped; the draw path clamps against the rendered height.
    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(author: &str) -> RepoEvent {
        RepoEvent {
            author: author.to_string(),
            action: Some("PUSH".to_string()),
            to_branch: "main".to_string(),
            timestamp: Some("2021-04-01T21:30:00Z".to_string()),
            ..RepoEvent::default()
        }
    }

    // ── poller events ──

    #[test]
    fn fetch_started_shows_loading_and_drops_banner() {
        let mut app = App::new("http://localhost:5000/api/events".to_string());
        app.error = Some("Failed to fetch events: HTTP status 500".to_string());

        app.apply(PollerEvent::FetchStarted);
        assert!(app.loading);
        assert_eq!(app.error, None);
        assert!(app.dirty);
    }

    #[test]
    fn fetched_replaces_list_and_updates_stats() {
        let mut app = App::new(String::new());
        app.apply(PollerEvent::Fetched {
            events: vec![event("alice"), event("bob")],
        });
        assert_eq!(app.events.len(), 2);
        assert_eq!(app.stats.total_events, 2);
        assert!(app.stats.last_update.is_some());
        assert!(!app.loading);

        // A later fetch replaces, never appends.
        app.apply(PollerEvent::Fetched {
            events: vec![event("carol")],
        });
        assert_eq!(app.events.len(), 1);
        assert_eq!(app.events[0].author, "carol");
        assert_eq!(app.stats.total_events, 1);
    }

    #[test]
    fn failure_keeps_previous_list() {
        let mut app = App::new(String::new());
        app.apply(PollerEvent::Fetched {
            events: vec![event("alice")],
        });
        app.apply(PollerEvent::FetchStarted);
        app.apply(PollerEvent::FetchFailed {
            message: "Failed to fetch events: HTTP status 500".to_string(),
        });

        assert_eq!(app.events.len(), 1);
        assert_eq!(app.stats.total_events, 1);
        assert_eq!(
            app.error.as_deref(),
            Some("Failed to fetch events: HTTP status 500")
        );
        assert!(!app.loading);
    }

    // ── clear ──

    #[test]
    fn clear_wipes_list_and_count_but_not_last_update() {
        let mut app = App::new(String::new());
        app.apply(PollerEvent::Fetched {
            events: vec![event("alice")],
        });
        let last_update = app.stats.last_update;

        app.clear();
        assert!(app.events.is_empty());
        assert_eq!(app.stats.total_events, 0);
        assert_eq!(app.stats.last_update, last_update);
        assert_eq!(app.scroll_offset, 0);
    }

    // ── scroll / tick ──

    #[test]
    fn scroll_up_saturates_at_zero() {
        let mut app = App::new(String::new());
        app.scroll_down(5);
        assert_eq!(app.scroll_offset, 5);
        app.scroll_up(100);
        assert_eq!(app.scroll_offset, 0);
    }

    #[test]
    fn tick_only_dirties_while_loading() {
        let mut app = App::new(String::new());
        app.dirty = false;
        app.bump_tick();
        assert_eq!(app.tick, 1);
        assert!(!app.dirty);

        app.loading = true;
        app.bump_tick();
        assert!(app.dirty);
    }
}
