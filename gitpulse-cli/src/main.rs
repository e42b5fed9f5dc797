mod app;
mod event;
mod theme;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use crossterm::event::{Event as TermEvent, KeyCode, KeyEventKind, KeyModifiers};
use gitpulse_core::{EventSink, EventSource, EventsClient, GitpulseConfig, Poller, PollerEvent};
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;

use app::App;
use event::AppEvent;

#[derive(Parser)]
struct Args {
    /// Base URL of the webhook receiver (its /api/events endpoint is polled)
    #[arg(long, env = "GITPULSE_BASE_URL")]
    base_url: Option<String>,

    /// Poll interval in seconds
    #[arg(long)]
    interval: Option<u64>,

    /// Fetch once, print the events to stdout, and exit
    #[arg(long)]
    once: bool,

    /// Disable mouse scroll support (re-enables terminal text selection)
    #[arg(long)]
    no_mouse: bool,

    /// Keep polling while the terminal is unfocused
    #[arg(long)]
    no_focus_pause: bool,

    /// Delete all gitpulse data (~/.gitpulse/) and exit
    #[arg(long)]
    reset: bool,
}

fn cleanup_terminal() {
    // Restore the terminal background color set at startup
    let _ = crossterm::execute!(std::io::stdout(), crossterm::style::Print("\x1b]111\x1b\\"));
    ratatui::restore();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Handle --reset before touching ~/.gitpulse for logging
    if args.reset {
        use std::io::Write;

        // Design system ANSI colors
        const SODIUM: &str = "\x1b[38;2;232;163;60m"; // #e8a33c
        const CHALK: &str = "\x1b[38;2;232;228;208m"; // #e8e4d0
        const ASH_TEXT: &str = "\x1b[38;2;90;90;80m"; // #5a5a50
        const LICHEN: &str = "\x1b[38;2;138;158;108m"; // #8a9e6c
        const ERR: &str = "\x1b[38;2;204;68;68m"; // #c44
        const BOLD: &str = "\x1b[1m";
        const RESET: &str = "\x1b[0m";

        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        let data_dir = PathBuf::from(&home).join(".gitpulse");

        eprintln!();
        eprintln!("  {SODIUM}{BOLD}gitpulse reset{RESET}");
        eprintln!();
        eprintln!("  {ERR}This will permanently delete all gitpulse data:{RESET}");
        eprintln!();
        eprintln!(
            "    {ASH_TEXT}config, logs   {CHALK}{}{RESET}",
            data_dir.display()
        );
        eprintln!();
        eprint!("  {SODIUM}Are you sure? [y/N]{RESET} ");
        std::io::stderr().flush()?;

        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer)?;
        if answer.trim().eq_ignore_ascii_case("y") {
            if data_dir.exists() {
                std::fs::remove_dir_all(&data_dir)?;
            }
            eprintln!("  {LICHEN}Done.{RESET} All data removed.");
        } else {
            eprintln!("  {ASH_TEXT}Aborted.{RESET}");
        }
        eprintln!();
        return Ok(());
    }

    // Set up file-based tracing (logs go to ~/.gitpulse/gitpulse.log)
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        let log_dir = PathBuf::from(&home).join(".gitpulse");
        std::fs::create_dir_all(&log_dir).ok();
        let log_file = std::fs::File::create(log_dir.join("gitpulse.log"))?;

        use tracing_subscriber::EnvFilter;
        let filter =
            EnvFilter::try_from_env("GITPULSE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(log_file)
            .with_ansi(false)
            .init();
    }

    // Flags and env override the stored config
    let mut config = GitpulseConfig::load().unwrap_or_default();
    if let Some(ref url) = args.base_url {
        config.base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(secs) = args.interval {
        config.poll_interval_ms = secs.max(1).saturating_mul(1000);
    }

    let client = EventsClient::new(&config.base_url, config.request_timeout())?;
    tracing::info!(
        "Polling {} every {}ms (request timeout {}ms)",
        client.endpoint(),
        config.poll_interval_ms,
        config.request_timeout_ms
    );

    // ── Headless mode: skip TUI, fetch once, print to stdout ──
    if args.once {
        return run_once(&client).await;
    }

    config.save()?;

    // Install panic hook that restores the terminal
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        cleanup_terminal();
        default_hook(info);
    }));

    // Initialize terminal
    let terminal = ratatui::init();

    // Set terminal background to match FORM so padding areas blend seamlessly (OSC 11)
    crossterm::execute!(
        std::io::stdout(),
        crossterm::style::Print("\x1b]11;rgb:0e/0d/0b\x1b\\")
    )?;

    // Enable mouse capture by default (scroll wheel works always)
    if !args.no_mouse {
        crossterm::execute!(std::io::stdout(), crossterm::event::EnableMouseCapture)?;
    }

    // Enable focus change tracking for pausing the poll loop
    crossterm::execute!(std::io::stdout(), crossterm::event::EnableFocusChange)?;

    let result = run_app(terminal, client, &config, &args).await;

    // Disable focus change tracking
    if let Err(e) = crossterm::execute!(std::io::stdout(), crossterm::event::DisableFocusChange) {
        tracing::warn!("Failed to disable focus reporting: {}", e);
    }

    // Disable mouse capture
    if !args.no_mouse
        && let Err(e) = crossterm::execute!(std::io::stdout(), crossterm::event::DisableMouseCapture)
    {
        tracing::warn!("Failed to disable mouse capture: {}", e);
    }

    cleanup_terminal();

    result
}

/// Fetch the event list once and print it as plain text. Failures exit
/// nonzero through anyhow.
async fn run_once(client: &EventsClient) -> anyhow::Result<()> {
    use anyhow::Context;

    let events = client
        .fetch_events()
        .await
        .context("failed to fetch events")?;

    if events.is_empty() {
        println!("No events yet.");
        return Ok(());
    }
    for event in &events {
        println!("[{}] {}", event.action_label(), event.formatted_time());
        let message = event.message();
        if !message.is_empty() {
            println!("  {message}");
        }
        println!("  request id: {}", event.request_id_label());
        println!();
    }
    Ok(())
}

/// Forwards poller output into the unified app event channel.
struct ChannelSink {
    tx: mpsc::UnboundedSender<AppEvent>,
}

#[async_trait::async_trait]
impl EventSink for ChannelSink {
    async fn emit(&self, event: PollerEvent) {
        let _ = self.tx.send(AppEvent::Poller(event));
    }
}

async fn run_app(
    mut terminal: DefaultTerminal,
    client: EventsClient,
    config: &GitpulseConfig,
    args: &Args,
) -> anyhow::Result<()> {
    let mut app = App::new(client.endpoint().to_string());

    // Unified event channel
    let (app_tx, mut app_rx) = mpsc::unbounded_channel::<AppEvent>();

    // Stop flag for the event reader thread
    let stop = Arc::new(AtomicBool::new(false));

    // Spawn terminal event reader using poll() with timeout so it can stop
    let term_tx = app_tx.clone();
    let stop_reader = Arc::clone(&stop);
    tokio::task::spawn_blocking(move || {
        while !stop_reader.load(Ordering::Relaxed) {
            // Poll with 50ms timeout so we can check the stop flag
            if crossterm::event::poll(std::time::Duration::from_millis(50)).unwrap_or(false) {
                match crossterm::event::read() {
                    Ok(ev) => {
                        if term_tx.send(AppEvent::Terminal(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }
        }
    });

    // Tick timer for spinner animation
    let tick_tx = app_tx.clone();
    let stop_tick = Arc::clone(&stop);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_millis(100));
        loop {
            interval.tick().await;
            if stop_tick.load(Ordering::Relaxed) {
                break;
            }
            if tick_tx.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    });

    // SIGTERM handler for graceful shutdown
    let sigterm_tx = app_tx.clone();
    tokio::spawn(async move {
        use tokio::signal::unix::{SignalKind, signal};
        if let Ok(mut sig) = signal(SignalKind::terminate()) {
            sig.recv().await;
            let _ = sigterm_tx.send(AppEvent::Quit);
        }
    });

    let mut poller = Poller::spawn(
        Arc::new(client),
        Arc::new(ChannelSink {
            tx: app_tx.clone(),
        }),
        config.poll_interval(),
    );
    poller.start();
    app.polling = poller.is_running();

    loop {
        // Draw only when dirty
        if app.dirty {
            let size = terminal.size()?;
            app.scroll_offset = app
                .scroll_offset
                .min(ui::max_scroll(&app, size.width, size.height));
            terminal.draw(|frame| ui::draw(frame, &app))?;
            app.dirty = false;
        }

        // Wait for next event
        let event = match app_rx.recv().await {
            Some(e) => e,
            None => break,
        };

        match event {
            AppEvent::Terminal(TermEvent::Key(key)) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                app.dirty = true;

                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
                {
                    break;
                }

                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('r') => poller.refresh(),
                    KeyCode::Char('c') => app.clear(),
                    KeyCode::Char('p') => {
                        if poller.is_running() {
                            poller.stop();
                        } else {
                            poller.start();
                        }
                        app.polling = poller.is_running();
                    }
                    KeyCode::Up => app.scroll_up(1),
                    KeyCode::Down => app.scroll_down(1),
                    KeyCode::PageUp => app.scroll_up(10),
                    KeyCode::PageDown => app.scroll_down(10),
                    _ => {}
                }
            }
            AppEvent::Terminal(TermEvent::Mouse(mouse)) => {
                use crossterm::event::MouseEventKind;
                match mouse.kind {
                    MouseEventKind::ScrollUp => app.scroll_up(3),
                    MouseEventKind::ScrollDown => app.scroll_down(3),
                    _ => {}
                }
            }
            AppEvent::Terminal(TermEvent::FocusGained) => {
                app.focused = true;
                app.dirty = true;
                if !args.no_focus_pause {
                    poller.start();
                    app.polling = poller.is_running();
                }
            }
            AppEvent::Terminal(TermEvent::FocusLost) => {
                app.focused = false;
                app.dirty = true;
                if !args.no_focus_pause {
                    poller.stop();
                    app.polling = poller.is_running();
                }
            }
            AppEvent::Terminal(_) => {
                // Resize events, etc.
                app.dirty = true;
            }
            AppEvent::Tick => app.bump_tick(),
            AppEvent::Poller(event) => app.apply(event),
            AppEvent::Quit => break,
        }
    }

    // Signal reader thread and tick timer to stop
    stop.store(true, Ordering::Relaxed);
    poller.shutdown().await;

    Ok(())
}
