use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::client::EventSource;
use crate::event::RepoEvent;

/// What the poller tells its render target.
#[derive(Clone, Debug)]
pub enum PollerEvent {
    /// A fetch is starting: show the loading indicator, drop any error banner.
    FetchStarted,
    /// A fetch succeeded: replace the rendered list and update the stats.
    Fetched { events: Vec<RepoEvent> },
    /// A fetch failed: show the banner, keep the previously rendered list.
    FetchFailed { message: String },
}

/// Host render sink for streaming poller events.
#[async_trait::async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: PollerEvent);
}

/// No-op sink useful for callers that only poke the poller's side effects.
pub struct NoopEventSink;

#[async_trait::async_trait]
impl EventSink for NoopEventSink {
    async fn emit(&self, _event: PollerEvent) {}
}

enum Command {
    Start,
    Stop,
    Refresh,
}

/// Owns the polling task for one dashboard.
///
/// A single long-lived task holds both the interval timer and the command
/// queue, so fetches are serialized (a slow response delays the next tick
/// instead of overlapping it) and renders arrive in fetch order. Dropping
/// the handle cancels the task.
pub struct Poller {
    commands: mpsc::UnboundedSender<Command>,
    cancel: CancellationToken,
    running: bool,
    task: Option<JoinHandle<()>>,
}

impl Poller {
    /// Spawn the polling task. Polling starts disabled; call [`start`](Self::start).
    pub fn spawn(
        source: Arc<dyn EventSource>,
        sink: Arc<dyn EventSink>,
        poll_interval: Duration,
    ) -> Self {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_loop(
            source,
            sink,
            poll_interval,
            command_rx,
            cancel.clone(),
        ));

        Self {
            commands,
            cancel,
            running: false,
            task: Some(task),
        }
    }

    /// Enable the recurring fetch: one immediately, then one per interval.
    ///
    /// No-op when already running, so a double start can never stack timers.
    /// Returns whether polling was actually (re)started.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = self.commands.send(Command::Start).is_ok();
        self.running
    }

    /// Disable the recurring fetch. An in-flight fetch still completes and
    /// renders. No-op when already stopped.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        self.commands.send(Command::Stop).is_ok()
    }

    /// Queue exactly one fetch, independent of the timer. Works while
    /// polling is stopped; never reschedules the interval.
    pub fn refresh(&self) {
        let _ = self.commands.send(Command::Refresh);
    }

    /// Whether the recurring fetch is currently enabled.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Cancel the polling task and wait for it to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run_loop(
    source: Arc<dyn EventSource>,
    sink: Arc<dyn EventSink>,
    poll_interval: Duration,
    mut commands: mpsc::UnboundedReceiver<Command>,
    cancel: CancellationToken,
) {
    let mut ticker: Option<Interval> = None;

    loop {
        let fetch_due = tokio::select! {
            _ = cancel.cancelled() => break,
            command = commands.recv() => match command {
                Some(Command::Start) => {
                    // Fresh interval per start; its first tick fires at once.
                    let mut interval = tokio::time::interval(poll_interval);
                    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                    ticker = Some(interval);
                    false
                }
                Some(Command::Stop) => {
                    ticker = None;
                    false
                }
                Some(Command::Refresh) => true,
                None => break,
            },
            _ = next_tick(&mut ticker), if ticker.is_some() => true,
        };

        if !fetch_due {
            continue;
        }

        // Race the fetch against cancellation so shutdown stays prompt even
        // mid-request.
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = poll_once(source.as_ref(), sink.as_ref()) => {}
        }
    }

    debug!("poller task exited");
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        // Unreachable behind the select guard; pending keeps the arm inert.
        None => std::future::pending().await,
    }
}

/// One fetch/render cycle. Failures are reported to the sink and logged,
/// never propagated; the loop keeps its schedule.
async fn poll_once(source: &dyn EventSource, sink: &dyn EventSink) {
    sink.emit(PollerEvent::FetchStarted).await;
    match source.fetch_events().await {
        Ok(events) => {
            debug!(count = events.len(), "fetched events");
            sink.emit(PollerEvent::Fetched { events }).await;
        }
        Err(err) => {
            warn!(error = %err, "event fetch failed");
            sink.emit(PollerEvent::FetchFailed {
                message: format!("Failed to fetch events: {err}"),
            })
            .await;
        }
    }
}
