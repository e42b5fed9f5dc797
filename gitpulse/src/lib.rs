pub mod client;
pub mod config;
pub mod event;
pub mod format;
pub mod poller;
pub mod stats;

// Re-exports
pub use client::{EventSource, EventsClient, FetchError};
pub use config::GitpulseConfig;
pub use event::{EventAction, RepoEvent};
pub use poller::{EventSink, NoopEventSink, Poller, PollerEvent};
pub use stats::DashboardStats;
