use chrono::{DateTime, Local};

/// Header stats: how many events the last fetch returned and when it landed.
#[derive(Clone, Debug, Default)]
pub struct DashboardStats {
    /// Event count from the most recent successful fetch.
    pub total_events: usize,
    /// Local wall-clock time of the most recent successful fetch.
    pub last_update: Option<DateTime<Local>>,
}

impl DashboardStats {
    /// Record a successful fetch of `count` events at the current local time.
    pub fn record_fetch(&mut self, count: usize) {
        self.record_fetch_at(count, Local::now());
    }

    /// As [`record_fetch`](Self::record_fetch), with an explicit clock.
    pub fn record_fetch_at(&mut self, count: usize, at: DateTime<Local>) {
        self.total_events = count;
        self.last_update = Some(at);
    }

    /// Manual clear: zero the displayed count. The last-update time stays,
    /// since clearing the view is not a fetch.
    pub fn clear(&mut self) {
        self.total_events = 0;
    }

    /// Label for the last-update display, `never` before the first fetch.
    pub fn last_update_label(&self) -> String {
        match self.last_update {
            Some(at) => at.format("%-l:%M:%S %p").to_string(),
            None => "never".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn starts_empty() {
        let stats = DashboardStats::default();
        assert_eq!(stats.total_events, 0);
        assert_eq!(stats.last_update_label(), "never");
    }

    #[test]
    fn records_count_and_clock() {
        let mut stats = DashboardStats::default();
        let at = Local.with_ymd_and_hms(2021, 4, 1, 21, 30, 5).unwrap();
        stats.record_fetch_at(3, at);
        assert_eq!(stats.total_events, 3);
        assert_eq!(stats.last_update_label(), "9:30:05 PM");
    }

    #[test]
    fn clear_zeroes_count_but_keeps_last_update() {
        let mut stats = DashboardStats::default();
        let at = Local.with_ymd_and_hms(2021, 4, 1, 9, 5, 0).unwrap();
        stats.record_fetch_at(7, at);
        stats.clear();
        assert_eq!(stats.total_events, 0);
        assert_eq!(stats.last_update_label(), "9:05:00 AM");
    }

    #[test]
    fn later_fetch_replaces_count() {
        let mut stats = DashboardStats::default();
        stats.record_fetch(5);
        stats.record_fetch(0);
        assert_eq!(stats.total_events, 0);
        assert!(stats.last_update.is_some());
    }
}
