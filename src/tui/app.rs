//! The event loop.
//!
//! Single-threaded cooperative scheduling for all state transitions: the
//! loop drains one message at a time from a FIFO queue, runs the update
//! engine, spawns any commands as worker tasks, and repaints. Gateway
//! calls and tick timers run in spawned tasks and communicate only by
//! sending messages back into the queue; they never touch the model.

use std::io::{self, Stdout};
use std::sync::Arc;

use chrono::Utc;
use crossterm::event::{Event as CrosstermEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::api::{Client, StationBoardRequest};
use crate::error::ApiError;

use super::command::{Command, API_TIMEOUT, COUNTDOWN_INTERVAL, REFRESH_INTERVAL};
use super::message::Message;
use super::model::Model;
use super::view;

/// Restores the primary screen even on panic or early return.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// The interactive application: owns the model, the message queue, and the
/// gateway handle shared with worker tasks.
pub struct App {
    client: Arc<Client>,
    model: Model,
    tx: mpsc::UnboundedSender<Message>,
    rx: mpsc::UnboundedReceiver<Message>,
}

impl App {
    pub fn new(client: Arc<Client>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            client,
            model: Model::new(),
            tx,
            rx,
        }
    }

    /// Run until the user quits or the process receives SIGTERM.
    pub async fn run(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let _guard = TerminalGuard;
        execute!(io::stdout(), EnterAlternateScreen)?;

        let mut terminal: Terminal<CrosstermBackend<Stdout>> =
            Terminal::new(CrosstermBackend::new(io::stdout()))?;
        terminal.clear()?;

        self.spawn_input_thread();

        // Seed the model with the current size; later resizes arrive as
        // messages from the input thread.
        if let Ok((w, h)) = crossterm::terminal::size() {
            self.model.update(Message::Resize(w, h));
        }

        // Raw mode turns Ctrl+C into a key event, but external signals
        // must still restore the primary screen.
        #[cfg(unix)]
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
        #[cfg(unix)]
        let mut sigint =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?;

        tracing::info!("TUI started");

        'outer: loop {
            terminal.draw(|frame| view::render(frame, &self.model, Utc::now()))?;

            let msg = {
                #[cfg(unix)]
                {
                    tokio::select! {
                        m = self.rx.recv() => match m {
                            Some(m) => m,
                            None => break 'outer,
                        },
                        _ = sigterm.recv() => break 'outer,
                        _ = sigint.recv() => break 'outer,
                    }
                }
                #[cfg(not(unix))]
                {
                    match self.rx.recv().await {
                        Some(m) => m,
                        None => break 'outer,
                    }
                }
            };

            for command in self.model.update(msg) {
                if command == Command::Quit {
                    break 'outer;
                }
                self.spawn_command(command);
            }
        }

        terminal.show_cursor()?;
        drop(_guard);
        Ok(())
    }

    /// Forward terminal events into the message queue from a blocking
    /// thread; `crossterm::event::read` has no async form.
    fn spawn_input_thread(&self) {
        let tx = self.tx.clone();
        std::thread::spawn(move || loop {
            let event = match crossterm::event::read() {
                Ok(event) => event,
                Err(err) => {
                    tracing::error!(error = %err, "failed to read terminal event");
                    break;
                }
            };
            let msg = match event {
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Message::Key(key),
                CrosstermEvent::Resize(w, h) => Message::Resize(w, h),
                _ => continue,
            };
            if tx.send(msg).is_err() {
                break;
            }
        });
    }

    /// Execute one command as an independent worker task. Gateway calls get
    /// a per-call deadline; superseded requests run to completion and are
    /// dropped by the update engine's stale-result checks.
    fn spawn_command(&self, command: Command) {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();

        match command {
            Command::Quit => {}

            Command::SearchStations { query, seq } => {
                tokio::spawn(async move {
                    let result =
                        match tokio::time::timeout(API_TIMEOUT, client.search_locations(&query))
                            .await
                        {
                            Ok(result) => result,
                            Err(_) => Err(ApiError::Timeout),
                        };
                    let _ = tx.send(Message::SearchResult { seq, result });
                });
            }

            Command::FetchBoard {
                station,
                modes,
                side,
            } => {
                tokio::spawn(async move {
                    let req = StationBoardRequest {
                        eva: station.eva,
                        station_id: station.id.clone(),
                        date_time: None,
                        num_vias: 5,
                        modes,
                    };
                    let result =
                        match tokio::time::timeout(API_TIMEOUT, client.station_board(req, side))
                            .await
                        {
                            Ok(result) => result,
                            Err(_) => Err(ApiError::Timeout),
                        };
                    let _ = tx.send(Message::BoardResult {
                        station_eva: station.eva,
                        result,
                    });
                });
            }

            Command::FetchJourney { journey_id } => {
                tokio::spawn(async move {
                    let result =
                        match tokio::time::timeout(API_TIMEOUT, client.journey(&journey_id, false))
                            .await
                        {
                            Ok(result) => result,
                            Err(_) => Err(ApiError::Timeout),
                        };
                    let _ = tx.send(Message::JourneyResult { journey_id, result });
                });
            }

            Command::ScheduleRefreshTick => {
                tokio::spawn(async move {
                    tokio::time::sleep(REFRESH_INTERVAL).await;
                    let _ = tx.send(Message::RefreshTick);
                });
            }

            Command::ScheduleCountdownTick => {
                tokio::spawn(async move {
                    tokio::time::sleep(COUNTDOWN_INTERVAL).await;
                    let _ = tx.send(Message::CountdownTick);
                });
            }
        }
    }
}
