use crossterm::event::Event as TermEvent;
use gitpulse_core::PollerEvent;

/// Unified event type for the main loop.
pub enum AppEvent {
    /// Key, mouse, resize, or focus change from crossterm.
    Terminal(TermEvent),
    /// Fetch lifecycle from the poller task.
    Poller(PollerEvent),
    /// Spinner animation tick.
    Tick,
    /// SIGTERM or a closed input channel.
    Quit,
}
